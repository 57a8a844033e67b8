//! Metrics registry containing all observability counters for beacon.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Central registry for beacon observability counters.
#[derive(Default)]
pub struct MetricsRegistry {
    /// Actuation loop counters
    pub actuation: Arc<ActuationMetrics>,
    /// Configuration path counters
    pub config: Arc<ConfigMetrics>,
}

impl MetricsRegistry {
    /// Creates a new registry with all counter groups initialized.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs a one-line summary of every counter. Called at shutdown.
    pub fn log_summary(&self) {
        tracing::info!(
            cycles = self.actuation.cycles(),
            render_failures = self.actuation.render_failures(),
            publish_failures = self.actuation.publish_failures(),
            config_messages = self.config.messages(),
            intervals_applied = self.config.intervals_applied(),
            sequences_applied = self.config.sequences_applied(),
            intervals_rejected = self.config.intervals_rejected(),
            sequences_rejected = self.config.sequences_rejected(),
            noop_messages = self.config.noop_messages(),
            oversize_payloads = self.config.oversize_payloads(),
            "Metrics summary"
        );
    }
}

/// Counters for the actuation loop.
#[derive(Default)]
pub struct ActuationMetrics {
    /// Completed actuation cycles
    cycles_total: AtomicU64,
    /// Render calls that returned an error
    render_failures_total: AtomicU64,
    /// Status publishes that returned an error
    publish_failures_total: AtomicU64,
}

impl ActuationMetrics {
    #[inline]
    pub fn record_cycle(&self) {
        self.cycles_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_render_failure(&self) {
        self.render_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_publish_failure(&self) {
        self.publish_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cycles(&self) -> u64 {
        self.cycles_total.load(Ordering::Relaxed)
    }

    pub fn render_failures(&self) -> u64 {
        self.render_failures_total.load(Ordering::Relaxed)
    }

    pub fn publish_failures(&self) -> u64 {
        self.publish_failures_total.load(Ordering::Relaxed)
    }
}

/// Counters for the configuration message path.
#[derive(Default)]
pub struct ConfigMetrics {
    /// Config payloads handed to the decoder
    messages_total: AtomicU64,
    /// Interval changes committed
    intervals_applied_total: AtomicU64,
    /// Sequence changes committed
    sequences_applied_total: AtomicU64,
    /// Interval fields rejected for being below minimum
    intervals_rejected_total: AtomicU64,
    /// Sequence fields rejected for being empty after splitting
    sequences_rejected_total: AtomicU64,
    /// Messages that changed nothing
    noop_messages_total: AtomicU64,
    /// Payloads dropped for exceeding the size cap
    oversize_payloads_total: AtomicU64,
}

impl ConfigMetrics {
    #[inline]
    pub fn record_message(&self) {
        self.messages_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_interval_applied(&self) {
        self.intervals_applied_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_sequence_applied(&self) {
        self.sequences_applied_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_interval_rejected(&self) {
        self.intervals_rejected_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_sequence_rejected(&self) {
        self.sequences_rejected_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_noop(&self) {
        self.noop_messages_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_oversize_payload(&self) {
        self.oversize_payloads_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn messages(&self) -> u64 {
        self.messages_total.load(Ordering::Relaxed)
    }

    pub fn intervals_applied(&self) -> u64 {
        self.intervals_applied_total.load(Ordering::Relaxed)
    }

    pub fn sequences_applied(&self) -> u64 {
        self.sequences_applied_total.load(Ordering::Relaxed)
    }

    pub fn intervals_rejected(&self) -> u64 {
        self.intervals_rejected_total.load(Ordering::Relaxed)
    }

    pub fn sequences_rejected(&self) -> u64 {
        self.sequences_rejected_total.load(Ordering::Relaxed)
    }

    pub fn noop_messages(&self) -> u64 {
        self.noop_messages_total.load(Ordering::Relaxed)
    }

    pub fn oversize_payloads(&self) -> u64 {
        self.oversize_payloads_total.load(Ordering::Relaxed)
    }
}
