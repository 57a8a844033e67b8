//! Configuration applier: validates a candidate update and commits it
//! to the sequence store.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{decode, CandidateUpdate, SequenceStore, MIN_INTERVAL};
use crate::contracts::ConfigError;
use crate::metrics::ConfigMetrics;

/// Result of applying one candidate update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Whether the interval was changed by this update.
    pub interval_changed: bool,
    /// Whether the sequence was changed by this update.
    pub sequence_changed: bool,
}

impl ApplyOutcome {
    /// True when the update changed nothing.
    pub fn is_noop(&self) -> bool {
        !self.interval_changed && !self.sequence_changed
    }
}

/// Validates candidate updates and commits them atomically.
///
/// # Behavior
/// - Each field validates independently; a rejected field never blocks
///   the other field's change (partial application).
/// - Whatever changed commits in a single locked mutation, so a
///   concurrent reader sees either the whole update or none of it, and
///   concurrent appliers cannot lose each other's single-field changes.
pub struct ConfigApplier {
    store: SequenceStore,
    metrics: Arc<ConfigMetrics>,
}

impl ConfigApplier {
    /// Creates an applier committing into `store`.
    pub fn new(store: SequenceStore, metrics: Arc<ConfigMetrics>) -> Self {
        Self { store, metrics }
    }

    /// Decodes a raw payload and applies the resulting candidate.
    pub fn apply_payload(&self, payload: &[u8]) -> Result<ApplyOutcome, ConfigError> {
        self.metrics.record_message();
        self.apply(&decode(payload))
    }

    /// Applies a candidate update to the store.
    pub fn apply(&self, candidate: &CandidateUpdate) -> Result<ApplyOutcome, ConfigError> {
        let pending_interval = self.validate_interval(candidate.interval_secs);
        let pending_sequence = self.validate_sequence(candidate.colors_csv.as_deref());

        let outcome = ApplyOutcome {
            interval_changed: pending_interval.is_some(),
            sequence_changed: pending_sequence.is_some(),
        };

        if outcome.is_noop() {
            self.metrics.record_noop();
            tracing::debug!("Config message changed nothing");
            return Ok(outcome);
        }

        let sequence_summary = pending_sequence.as_ref().map(|s| s.join(","));

        self.store.update(|config| {
            if let Some(interval) = pending_interval {
                config.interval = interval;
            }
            if let Some(sequence) = pending_sequence {
                config.sequence = sequence;
            }
        })?;

        if let Some(interval) = pending_interval {
            self.metrics.record_interval_applied();
            tracing::info!(interval_ms = interval.as_millis() as u64, "Interval updated");
        }
        if let Some(sequence) = sequence_summary {
            self.metrics.record_sequence_applied();
            tracing::info!(sequence = %sequence, "Sequence updated");
        }

        Ok(outcome)
    }

    /// Interval must be at least [`MIN_INTERVAL`] whole seconds.
    fn validate_interval(&self, interval_secs: Option<i64>) -> Option<Duration> {
        let secs = interval_secs?;
        if secs >= MIN_INTERVAL.as_secs() as i64 {
            Some(Duration::from_secs(secs as u64))
        } else {
            self.metrics.record_interval_rejected();
            tracing::warn!(
                interval_sec = secs,
                min_sec = MIN_INTERVAL.as_secs(),
                "Rejected interval below minimum"
            );
            None
        }
    }

    /// Split on commas, trim, drop empty tokens; the result must be
    /// non-empty or the field is rejected.
    fn validate_sequence(&self, colors_csv: Option<&str>) -> Option<Vec<String>> {
        let csv = colors_csv?;
        let tokens: Vec<String> = csv
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .collect();

        if tokens.is_empty() {
            self.metrics.record_sequence_rejected();
            tracing::warn!(colors = %csv, "Rejected empty color sequence");
            None
        } else {
            Some(tokens)
        }
    }
}
