//! Property-Based Tests for the replay engine
//!
//! Tests the following invariants over generated review logs:
//! - Determinism: two replays of the same log are bit-identical
//! - Non-negativity: every retention slot is >= 0 and finite
//! - Coverage: with at least one graded review, the curve reaches end_day
//! - State sanity: final stabilities are never negative

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use danci_replay::{
    replay_simple, FsrsModel, ModelProvider, ReplayConfig, ReviewEvent, ReviewGrade, DAY_MS,
};

// ============================================================================
// Arbitrary Generators
// ============================================================================

const LOG_START_MS: i64 = 1_600_000_000_000;

fn arb_raw_grade() -> impl Strategy<Value = i8> {
    prop_oneof![
        Just(-1i8),
        Just(1i8),
        Just(2i8),
        Just(3i8),
        Just(4i8),
    ]
}

/// A sorted log: per-event gaps of 0..=3 days plus sub-day jitter, item ids
/// drawn from a small pool so items interleave, first event always graded.
fn arb_log() -> impl Strategy<Value = Vec<ReviewEvent>> {
    let step = (0i64..=3, 0i64..DAY_MS, 1i64..=5, arb_raw_grade());
    (1i8..=4, proptest::collection::vec(step, 0..40)).prop_map(|(first_grade, steps)| {
        let mut at_ms = LOG_START_MS;
        let mut events = vec![ReviewEvent::from_raw(1, ts(at_ms), first_grade).unwrap()];
        for (gap_days, jitter_ms, item, raw_grade) in steps {
            at_ms += gap_days * DAY_MS + jitter_ms;
            events.push(ReviewEvent::from_raw(item, ts(at_ms), raw_grade).unwrap());
        }
        events.sort_by_key(|event| event.at);
        events
    })
}

fn ts(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).unwrap()
}

fn config_for(events: &[ReviewEvent], rollover_ms: i64) -> ReplayConfig {
    // End a few days after the last event so finalization has room to run.
    let end = events.last().expect("non-empty log").at + chrono::Duration::days(3);
    ReplayConfig {
        rollover_ms,
        end: Some(end),
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn replay_is_deterministic(events in arb_log(), rollover_ms in 0i64..DAY_MS) {
        let models = ModelProvider::Shared(FsrsModel::new());
        let config = config_for(&events, rollover_ms);

        let first = replay_simple(&events, &models, &config).unwrap();
        let second = replay_simple(&events, &models, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn retention_slots_are_nonnegative_and_finite(events in arb_log()) {
        let models = ModelProvider::Shared(FsrsModel::new());
        let config = config_for(&events, 0);

        let outcome = replay_simple(&events, &models, &config).unwrap();
        for &slot in &outcome.retention_by_day {
            prop_assert!(slot.is_finite());
            prop_assert!(slot >= 0.0);
        }
    }

    #[test]
    fn curve_reaches_end_day(events in arb_log(), rollover_ms in 0i64..DAY_MS) {
        let models = ModelProvider::Shared(FsrsModel::new());
        let config = config_for(&events, rollover_ms);

        let outcome = replay_simple(&events, &models, &config).unwrap();
        // The first event is always graded, so at least one item decays
        // through the end of the window.
        let expected_len = (outcome.end_day - outcome.start_day + 1) as usize;
        prop_assert_eq!(outcome.retention_by_day.len(), expected_len);
        prop_assert!(outcome.retention_by_day[expected_len - 1] > 0.0);
    }

    #[test]
    fn final_stabilities_are_never_negative(events in arb_log()) {
        let models = ModelProvider::Shared(FsrsModel::new());
        let config = config_for(&events, 0);

        let outcome = replay_simple(&events, &models, &config).unwrap();
        for state in outcome.final_states.values() {
            prop_assert!(state.stability >= 0.0);
            prop_assert!(state.last_review.is_some());
        }
    }
}
