use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use beacon::actuator::resolve_state;
use beacon::config::{decode, ConfigApplier, SequenceStore, MAX_COLORS_LEN, MIN_INTERVAL};
use beacon::metrics::ConfigMetrics;

fn applier_for(store: &SequenceStore) -> ConfigApplier {
    ConfigApplier::new(store.clone(), Arc::new(ConfigMetrics::default()))
}

// =============================================================================
// Strategies
// =============================================================================

/// Intervals the applier accepts.
fn arb_valid_interval() -> impl Strategy<Value = i64> {
    1i64..86_400
}

/// A color token with no commas, quotes, or surrounding whitespace.
fn arb_color_token() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

/// A list of tokens that survives the decoder's length cap when joined.
fn arb_color_tokens() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_color_token(), 1..8).prop_filter(
        "joined list must fit the decoder cap",
        |tokens| tokens.join(",").len() <= MAX_COLORS_LEN,
    )
}

/// Any sequence the store could hold.
fn arb_sequence() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_color_token(), 1..10)
}

// =============================================================================
// Properties
// =============================================================================

/// Property: a valid payload round-trips exactly through
/// decode -> apply -> read.
fn prop_valid_payload_round_trips(interval_secs: i64, tokens: &[String]) {
    let store = SequenceStore::new();
    let applier = applier_for(&store);

    let payload = format!(
        r#"{{"interval_sec":{},"colors":"{}"}}"#,
        interval_secs,
        tokens.join(",")
    );
    let candidate = decode(payload.as_bytes());
    applier.apply(&candidate).expect("apply should succeed");

    let config = store.read().expect("read should succeed");
    assert_eq!(config.interval, Duration::from_secs(interval_secs as u64));
    assert_eq!(config.sequence, tokens);
}

/// Property: resolve_state equals direct modular indexing.
fn prop_resolve_matches_modular_index(sequence: &[String], cursor: u64) {
    let expected = &sequence[(cursor % sequence.len() as u64) as usize];
    assert_eq!(resolve_state(sequence, cursor), expected);
}

/// Property: advancing the cursor once per iteration over len(sequence)
/// iterations visits every element exactly once, from any start.
fn prop_full_cycle_visits_every_element(sequence: &[String], start: u64) {
    let mut visited_positions = HashSet::new();
    for step in 0..sequence.len() as u64 {
        let cursor = start.wrapping_add(step);
        let state = resolve_state(sequence, cursor);
        let position = (cursor % sequence.len() as u64) as usize;
        assert_eq!(state, &sequence[position]);
        visited_positions.insert(position);
    }
    assert_eq!(visited_positions.len(), sequence.len());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The decoder must never panic, whatever bytes arrive.
    #[test]
    fn test_decode_never_panics(payload in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode(&payload);
    }

    /// Decode followed by apply must never panic either, and whatever it
    /// does the store invariants hold afterwards.
    #[test]
    fn test_apply_preserves_invariants(payload in prop::collection::vec(any::<u8>(), 0..512)) {
        let store = SequenceStore::new();
        let applier = applier_for(&store);
        applier.apply_payload(&payload).expect("apply should succeed");

        let config = store.read().expect("read should succeed");
        prop_assert!(!config.sequence.is_empty());
        prop_assert!(config.interval >= MIN_INTERVAL);
    }

    #[test]
    fn test_valid_payloads_round_trip(
        interval_secs in arb_valid_interval(),
        tokens in arb_color_tokens()
    ) {
        prop_valid_payload_round_trips(interval_secs, &tokens);
    }

    /// Applying the same candidate twice stores the same config as once.
    #[test]
    fn test_apply_is_idempotent(
        interval_secs in arb_valid_interval(),
        tokens in arb_color_tokens()
    ) {
        let store = SequenceStore::new();
        let applier = applier_for(&store);
        let payload = format!(
            r#"{{"interval_sec":{},"colors":"{}"}}"#,
            interval_secs,
            tokens.join(",")
        );
        let candidate = decode(payload.as_bytes());

        applier.apply(&candidate).expect("apply should succeed");
        let after_once = store.read().expect("read should succeed");
        applier.apply(&candidate).expect("apply should succeed");

        prop_assert_eq!(store.read().expect("read should succeed"), after_once);
    }

    /// Below-minimum intervals are always rejected, whatever the value.
    #[test]
    fn test_below_minimum_interval_always_rejected(interval_secs in i64::MIN..1) {
        let store = SequenceStore::new();
        let applier = applier_for(&store);
        let payload = format!(r#"{{"interval_sec":{}}}"#, interval_secs);

        applier.apply_payload(payload.as_bytes()).expect("apply should succeed");

        let config = store.read().expect("read should succeed");
        prop_assert_eq!(config.interval, Duration::from_millis(3000));
    }

    #[test]
    fn test_resolve_matches_modular_index(
        sequence in arb_sequence(),
        cursor in any::<u64>()
    ) {
        prop_resolve_matches_modular_index(&sequence, cursor);
    }

    #[test]
    fn test_full_cycle_visits_every_element(
        sequence in arb_sequence(),
        start in any::<u64>()
    ) {
        prop_full_cycle_visits_every_element(&sequence, start);
    }
}
