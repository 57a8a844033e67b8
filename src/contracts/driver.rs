use crate::contracts::error::DriverError;

/// Renders a named output state as a hardware signal.
///
/// # Behavior
/// - `render` is called once per actuation phase: the current state name
///   at the start of a cycle, then [`OFF_STATE`](crate::config::OFF_STATE)
///   to blank the output before the next cycle.
/// - A failed render affects that call only; the actuation loop logs it
///   and keeps cycling.
pub trait OutputDriver: Send + Sync {
    /// Renders a single state. Must not block for longer than the
    /// hardware transaction itself.
    fn render(&self, state: &str) -> Result<(), DriverError>;
}
