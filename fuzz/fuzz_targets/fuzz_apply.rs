#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;

use beacon::config::{ConfigApplier, SequenceStore, MIN_INTERVAL};
use beacon::metrics::ConfigMetrics;

fuzz_target!(|data: &[u8]| {
    let store = SequenceStore::new();
    let applier = ConfigApplier::new(store.clone(), Arc::new(ConfigMetrics::default()));

    // Fuzz the full decode -> validate -> commit path
    // This should never panic, regardless of input
    let _ = applier.apply_payload(data);

    // Whatever arrived, the store invariants must hold afterwards
    let config = store.read().unwrap();
    assert!(!config.sequence.is_empty());
    assert!(config.interval >= MIN_INTERVAL);
});
