//! Inbound configuration dispatcher: a background task draining raw
//! payloads from a channel and driving the decoder/applier pair.
//!
//! The producing side of the channel belongs to transport glue (an MQTT
//! session, stdin in the demo binary); the dispatcher owns everything
//! after delivery.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use tokio::sync::{mpsc, Mutex, Notify};
use tokio::task::JoinHandle;

use crate::config::ConfigApplier;
use crate::contracts::{Actuator, ConfigError, LockResultExt};
use crate::metrics::ConfigMetrics;

/// Topic the transport glue is expected to subscribe for configuration
/// messages.
pub const CONFIG_TOPIC: &str = "beacon/config";

/// Payloads above this size are dropped before decoding. A deliberate
/// resource limit; legitimate config messages are a fraction of it.
pub const MAX_PAYLOAD_LEN: usize = 1024;

/// Configuration for the dispatcher.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Bound on queued payloads before senders see backpressure
    pub channel_capacity: usize,
    /// Maximum accepted payload size in bytes
    pub max_payload_len: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 16,
            max_payload_len: MAX_PAYLOAD_LEN,
        }
    }
}

/// Background task applying inbound configuration payloads.
///
/// A malformed or oversize payload is logged and dropped; nothing on
/// this path can crash the task or stall the actuation loop.
pub struct ConfigDispatcher {
    applier: Arc<ConfigApplier>,
    metrics: Arc<ConfigMetrics>,
    config: DispatcherConfig,
    tx: mpsc::Sender<Bytes>,
    /// Held by the running task for its lifetime; reacquired on restart
    rx: Arc<Mutex<mpsc::Receiver<Bytes>>>,
    /// Flag to signal shutdown
    shutdown: Arc<AtomicBool>,
    /// Wakes the task when no payload is pending
    shutdown_notify: Arc<Notify>,
    /// Handle to the background task
    task_handle: RwLock<Option<JoinHandle<()>>>,
}

impl ConfigDispatcher {
    /// Creates a dispatcher feeding `applier`.
    pub fn new(
        applier: Arc<ConfigApplier>,
        metrics: Arc<ConfigMetrics>,
        config: DispatcherConfig,
    ) -> Self {
        let (tx, rx) = mpsc::channel(config.channel_capacity);
        Self {
            applier,
            metrics,
            config,
            tx,
            rx: Arc::new(Mutex::new(rx)),
            shutdown: Arc::new(AtomicBool::new(false)),
            shutdown_notify: Arc::new(Notify::new()),
            task_handle: RwLock::new(None),
        }
    }

    /// Producer handle for transport glue. Cloning is cheap; dropping
    /// every sender ends the dispatcher task.
    pub fn sender(&self) -> mpsc::Sender<Bytes> {
        self.tx.clone()
    }

    fn handle_payload(
        applier: &ConfigApplier,
        metrics: &ConfigMetrics,
        max_payload_len: usize,
        payload: &Bytes,
    ) {
        if payload.len() > max_payload_len {
            metrics.record_oversize_payload();
            tracing::warn!(
                payload_len = payload.len(),
                max_len = max_payload_len,
                "Dropped oversize config payload"
            );
            return;
        }

        match applier.apply_payload(payload) {
            Ok(outcome) => {
                tracing::debug!(
                    interval_changed = outcome.interval_changed,
                    sequence_changed = outcome.sequence_changed,
                    "Config message processed"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to apply config message");
            }
        }
    }
}

impl Actuator for ConfigDispatcher {
    async fn start(&self) -> Result<(), ConfigError> {
        self.shutdown.store(false, Ordering::SeqCst);

        let applier = Arc::clone(&self.applier);
        let metrics = Arc::clone(&self.metrics);
        let rx = Arc::clone(&self.rx);
        let shutdown = Arc::clone(&self.shutdown);
        let shutdown_notify = Arc::clone(&self.shutdown_notify);
        let max_payload_len = self.config.max_payload_len;

        let handle = tokio::spawn(async move {
            tracing::info!("Config dispatcher started");

            let mut rx = rx.lock().await;

            loop {
                tokio::select! {
                    maybe_payload = rx.recv() => match maybe_payload {
                        Some(payload) => {
                            Self::handle_payload(&applier, &metrics, max_payload_len, &payload);
                        }
                        None => {
                            tracing::info!("Config channel closed");
                            break;
                        }
                    },
                    _ = shutdown_notify.notified() => {},
                }

                if shutdown.load(Ordering::SeqCst) {
                    break;
                }
            }

            tracing::info!("Config dispatcher stopped");
        });

        let mut task_handle = self.task_handle.write().map_lock_err()?;
        *task_handle = Some(handle);

        Ok(())
    }

    async fn stop(&self) -> Result<(), ConfigError> {
        self.shutdown.store(true, Ordering::SeqCst);
        self.shutdown_notify.notify_one(); // Wake up the task

        let handle = {
            let mut task_handle = self.task_handle.write().map_lock_err()?;
            task_handle.take()
        };

        if let Some(handle) = handle {
            handle
                .await
                .map_err(|e| ConfigError::TaskJoin(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatcher_config_default() {
        let config = DispatcherConfig::default();
        assert_eq!(config.channel_capacity, 16);
        assert_eq!(config.max_payload_len, MAX_PAYLOAD_LEN);
    }
}
