use std::future::Future;

use crate::contracts::error::ConfigError;

/// Lifecycle contract for the long-running background tasks (the
/// actuation loop and the config dispatcher).
///
/// # Behavior
/// - `start` spawns the task and returns immediately
/// - `stop` requests shutdown, wakes any in-progress suspension, and
///   joins the task before returning
/// - `start` after `stop` begins a fresh run
pub trait Actuator: Send + Sync {
    /// Starts the background task.
    fn start(&self) -> impl Future<Output = Result<(), ConfigError>> + Send;

    /// Stops the background task gracefully.
    fn stop(&self) -> impl Future<Output = Result<(), ConfigError>> + Send;
}
