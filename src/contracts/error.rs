use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BeaconError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

/// Extension trait for converting lock errors to ConfigError.
pub trait LockResultExt<T> {
    /// Converts a lock error to a ConfigError.
    fn map_lock_err(self) -> Result<T, ConfigError>;
}

impl<'a, T> LockResultExt<RwLockReadGuard<'a, T>>
    for Result<RwLockReadGuard<'a, T>, PoisonError<RwLockReadGuard<'a, T>>>
{
    #[inline]
    fn map_lock_err(self) -> Result<RwLockReadGuard<'a, T>, ConfigError> {
        self.map_err(|e| ConfigError::LockPoisoned(e.to_string()))
    }
}

impl<'a, T> LockResultExt<RwLockWriteGuard<'a, T>>
    for Result<RwLockWriteGuard<'a, T>, PoisonError<RwLockWriteGuard<'a, T>>>
{
    #[inline]
    fn map_lock_err(self) -> Result<RwLockWriteGuard<'a, T>, ConfigError> {
        self.map_err(|e| ConfigError::LockPoisoned(e.to_string()))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Task join error: {0}")]
    TaskJoin(String),
}

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Render failed for state {state}: {reason}")]
    RenderFailed { state: String, reason: String },
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Publish to {topic} failed: {reason}")]
    Failed { topic: String, reason: String },

    #[error("Transport not connected")]
    NotConnected,
}
