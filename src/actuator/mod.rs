//! The actuation loop: a background task that cycles through the
//! configured state sequence, rendering and publishing each state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::config::{SequenceStore, DEFAULT_STATE, OFF_STATE};
use crate::contracts::{Actuator, ConfigError, LockResultExt, OutputDriver, StatusPublisher};
use crate::metrics::ActuationMetrics;

/// Topic the current state name is published on each cycle.
pub const STATUS_TOPIC: &str = "beacon/status";

/// Off period between two rendered states, long enough to make the
/// transition visible on hardware.
pub const OFF_GAP: Duration = Duration::from_millis(100);

/// Configuration for the actuation loop.
#[derive(Debug, Clone)]
pub struct ActuatorConfig {
    /// Topic for outbound status messages
    pub status_topic: String,
    /// Off period between two rendered states
    pub off_gap: Duration,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            status_topic: STATUS_TOPIC.to_string(),
            off_gap: OFF_GAP,
        }
    }
}

/// Resolves the state name for a cursor position, cycling through the
/// sequence. An empty sequence resolves to [`DEFAULT_STATE`]; the
/// applier never commits one, but the store itself does not enforce it.
pub fn resolve_state(sequence: &[String], cursor: u64) -> &str {
    if sequence.is_empty() {
        return DEFAULT_STATE;
    }
    &sequence[(cursor % sequence.len() as u64) as usize]
}

/// Background task cycling through the configured sequence.
///
/// Each iteration snapshots the shared configuration, renders and
/// publishes the current state, sleeps the snapshot's interval, blanks
/// the output, sleeps the off gap, and advances the cursor. A
/// configuration change landing mid-sleep affects the next iteration,
/// never the sleep in progress.
pub struct CycleActuator<D, P>
where
    D: OutputDriver + 'static,
    P: StatusPublisher + 'static,
{
    store: SequenceStore,
    driver: Arc<D>,
    publisher: Arc<P>,
    config: ActuatorConfig,
    metrics: Arc<ActuationMetrics>,
    /// Flag to signal shutdown
    shutdown: Arc<AtomicBool>,
    /// Wakes an in-progress sleep so shutdown never waits out an interval
    shutdown_notify: Arc<Notify>,
    /// Handle to the background task
    task_handle: RwLock<Option<JoinHandle<()>>>,
}

impl<D, P> CycleActuator<D, P>
where
    D: OutputDriver + 'static,
    P: StatusPublisher + 'static,
{
    /// Creates a new actuator reading from `store`.
    pub fn new(
        store: SequenceStore,
        driver: Arc<D>,
        publisher: Arc<P>,
        config: ActuatorConfig,
        metrics: Arc<ActuationMetrics>,
    ) -> Self {
        Self {
            store,
            driver,
            publisher,
            config,
            metrics,
            shutdown: Arc::new(AtomicBool::new(false)),
            shutdown_notify: Arc::new(Notify::new()),
            task_handle: RwLock::new(None),
        }
    }

    /// One rendered-and-published phase of a cycle. Render and publish
    /// failures are logged and counted; neither stops the loop.
    async fn run_phase(
        driver: &D,
        publisher: &P,
        metrics: &ActuationMetrics,
        status_topic: &str,
        state: &str,
    ) {
        if let Err(e) = driver.render(state) {
            metrics.record_render_failure();
            tracing::warn!(state, error = %e, "Render failed");
        }

        if let Err(e) = publisher.publish(status_topic, state).await {
            metrics.record_publish_failure();
            tracing::warn!(topic = status_topic, state, error = %e, "Status publish failed");
        }
    }
}

impl<D, P> Actuator for CycleActuator<D, P>
where
    D: OutputDriver + 'static,
    P: StatusPublisher + 'static,
{
    async fn start(&self) -> Result<(), ConfigError> {
        self.shutdown.store(false, Ordering::SeqCst);

        let store = self.store.clone();
        let driver = Arc::clone(&self.driver);
        let publisher = Arc::clone(&self.publisher);
        let metrics = Arc::clone(&self.metrics);
        let shutdown = Arc::clone(&self.shutdown);
        let shutdown_notify = Arc::clone(&self.shutdown_notify);
        let status_topic = self.config.status_topic.clone();
        let off_gap = self.config.off_gap;

        let handle = tokio::spawn(async move {
            tracing::info!("Actuation loop started");

            // Private to this task; a configuration change never resets
            // it, only changes which position it maps to.
            let mut cursor: u64 = 0;

            loop {
                if shutdown.load(Ordering::SeqCst) {
                    break;
                }

                // Snapshot once per iteration; the interval below is the
                // one read here even if a config change lands mid-sleep.
                let config = match store.read() {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::error!(error = %e, "Config store unreadable, stopping loop");
                        break;
                    }
                };

                let state = resolve_state(&config.sequence, cursor);
                Self::run_phase(&driver, &publisher, &metrics, &status_topic, state).await;

                tracing::debug!(
                    state,
                    interval_ms = config.interval.as_millis() as u64,
                    "State rendered"
                );

                tokio::select! {
                    _ = tokio::time::sleep(config.interval) => {},
                    _ = shutdown_notify.notified() => {},
                }
                if shutdown.load(Ordering::SeqCst) {
                    break;
                }

                if let Err(e) = driver.render(OFF_STATE) {
                    metrics.record_render_failure();
                    tracing::warn!(error = %e, "Off render failed");
                }

                tokio::select! {
                    _ = tokio::time::sleep(off_gap) => {},
                    _ = shutdown_notify.notified() => {},
                }

                metrics.record_cycle();
                cursor = cursor.wrapping_add(1);
            }

            tracing::info!("Actuation loop stopped");
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
