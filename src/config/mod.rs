//! Shared sequence configuration: the single piece of mutable state
//! exchanged between the config dispatcher and the actuation loop.

pub mod apply;
pub mod decode;

pub use apply::{ApplyOutcome, ConfigApplier};
pub use decode::{decode, CandidateUpdate, MAX_COLORS_LEN};

use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::contracts::{ConfigError, LockResultExt};

/// Minimum accepted actuation interval. Updates below this are rejected.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Interval used until the first configuration message arrives.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(3000);

/// Sequence used until the first configuration message arrives.
pub const DEFAULT_SEQUENCE: [&str; 3] = ["red", "green", "blue"];

/// Fallback state name when a sequence is unexpectedly empty.
pub const DEFAULT_STATE: &str = "red";

/// State name rendered to blank the output between cycles.
pub const OFF_STATE: &str = "off";

/// The shared interval + ordered state-name list.
///
/// # Invariants
/// - `sequence` is never empty
/// - `interval` is never below [`MIN_INTERVAL`]
///
/// Both are upheld by [`ConfigApplier`], not by the store; code that
/// writes the store directly (tests) can violate them, which is why the
/// actuation loop still falls back to [`DEFAULT_STATE`] on an empty
/// sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceConfig {
    /// Time each state stays rendered before the off gap.
    pub interval: Duration,
    /// Ordered state names, cycled through by the actuation loop.
    pub sequence: Vec<String>,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            sequence: DEFAULT_SEQUENCE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Shared handle to the sequence configuration.
///
/// # Behavior
/// - `read` returns a consistent snapshot: a reader never observes the
///   interval of one write paired with the sequence of another
/// - `write` replaces both fields in one indivisible step
/// - `update` is a serialized read-modify-write for partial changes, so
///   two concurrent single-field updates cannot lose each other
/// - the store validates nothing; validation is the applier's job
///
/// Cloning the handle shares the same underlying configuration.
#[derive(Debug, Clone, Default)]
pub struct SequenceStore {
    inner: Arc<RwLock<SequenceConfig>>,
}

impl SequenceStore {
    /// Creates a store holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding a specific initial configuration.
    pub fn with_config(config: SequenceConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Returns a consistent snapshot of the current configuration.
    pub fn read(&self) -> Result<SequenceConfig, ConfigError> {
        let guard = self.inner.read().map_lock_err()?;
        Ok(guard.clone())
    }

    /// Replaces the entire configuration atomically.
    pub fn write(&self, config: SequenceConfig) -> Result<(), ConfigError> {
        let mut guard = self.inner.write().map_lock_err()?;
        *guard = config;
        Ok(())
    }

    /// Mutates the configuration under the write lock.
    ///
    /// The closure must not block or panic; the lock is held only for
    /// its duration.
    pub fn update(&self, f: impl FnOnce(&mut SequenceConfig)) -> Result<(), ConfigError> {
        let mut guard = self.inner.write().map_lock_err()?;
        f(&mut guard);
        Ok(())
    }
}
