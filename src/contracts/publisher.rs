use std::future::Future;

use crate::contracts::error::PublishError;

/// Outbound publish channel for status messages.
///
/// # Behavior
/// - `publish` is fire-and-forget from the caller's perspective: the
///   actuation loop publishes once per cycle and never retries inline,
///   so a failure only delays visibility until the next cycle.
/// - Implementations own the transport session; the core assumes the
///   session is ready before any task starts.
pub trait StatusPublisher: Send + Sync {
    /// Publishes a payload to a topic.
    fn publish(
        &self,
        topic: &str,
        payload: &str,
    ) -> impl Future<Output = Result<(), PublishError>> + Send;
}
