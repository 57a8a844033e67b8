//! Observability counters for beacon.
//!
//! All counters use lock-free atomics so recording from the actuation
//! hot path and the message-handling path costs a relaxed add.

pub mod registry;

pub use registry::{ActuationMetrics, ConfigMetrics, MetricsRegistry};
