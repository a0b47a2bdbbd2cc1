//! Historical Replay Engine
//!
//! Walks a chronologically ordered review log and reconstructs, for every
//! item, the memory state it had at each point in history, while summing a
//! population-level retention curve over calendar days. The memory model
//! itself is a black box (see [`crate::model`]); this module owns the day
//! bucketing, the per-item state machine (normal review vs. forget reset),
//! the incremental retention accumulation, and the observation hooks.
//!
//! One call processes the entire log to completion: single-threaded,
//! synchronous, no I/O. Given the same ordered log, models, rollover offset
//! and end instant, every run produces bit-identical output.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ReplayError;
use crate::model::{MemoryModel, ModelProvider};
use crate::types::{DayRange, ItemId, ItemMemory, MemoryState, ReviewEvent, ReviewGrade, DAY_MS};

// ==================== Day Clock ====================

/// Map an instant to its day index. The rollover offset (milliseconds past
/// midnight UTC that still count as the previous day) is subtracted before
/// flooring, so a review exactly at the rollover boundary belongs to the new
/// day. Every timestamp-to-day conversion in the engine goes through here so
/// that range bounds stay comparable.
pub fn day_index(at: DateTime<Utc>, rollover_ms: i64) -> i64 {
    (at.timestamp_millis() - rollover_ms).div_euclid(DAY_MS)
}

// ==================== Configuration ====================

/// Replay window configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Milliseconds after midnight UTC at which a new "day" starts. Activity
    /// before the offset counts toward the previous day.
    pub rollover_ms: i64,
    /// End of the analysis window. `None` means the wall clock at call time;
    /// pass an explicit instant for reproducible runs.
    pub end: Option<DateTime<Utc>>,
}

impl ReplayConfig {
    pub fn new(rollover_ms: i64, end: DateTime<Utc>) -> Self {
        Self {
            rollover_ms,
            end: Some(end),
        }
    }
}

// ==================== Hooks ====================

/// Invoked after a review's day range was accumulated, with the anchoring
/// stability, the item state as of the hook call, and the covered range.
pub type ReviewRangeHook<'a> = Box<dyn FnMut(f64, &ItemMemory, DayRange) + 'a>;

/// Invoked after a forget reset was applied, with the item and its new state.
pub type ForgetHook<'a> = Box<dyn FnMut(ItemId, &ItemMemory) + 'a>;

/// Invoked once for every day that closes between consecutive events, in
/// increasing day order, with the closed day's index and snapshots of the
/// item states and of the last-known-stability ledger.
pub type DayEndHook<'a> = Box<dyn FnMut(i64, &HashMap<ItemId, ItemMemory>, &HashMap<ItemId, f64>) + 'a>;

/// Optional observation hooks. Each absent hook is a true no-op. Hooks run
/// inline and synchronously, in event order; a hook always sees the fully
/// updated state for the point it observes.
#[derive(Default)]
pub struct ReplayHooks<'a> {
    pub on_review_range: Option<ReviewRangeHook<'a>>,
    pub on_forget: Option<ForgetHook<'a>>,
    pub on_day_end: Option<DayEndHook<'a>>,
}

impl<'a> ReplayHooks<'a> {
    /// Hook bundle that observes nothing.
    pub fn none() -> Self {
        Self::default()
    }
}

// ==================== Retention Accumulator ====================

/// Dense per-day sums of retrievability, anchored at the first event's day.
struct RetentionCurve {
    start_day: i64,
    slots: Vec<f64>,
}

impl RetentionCurve {
    fn new(start_day: i64) -> Self {
        Self {
            start_day,
            slots: Vec::new(),
        }
    }

    /// Add one forgetting-curve sample per integer day in `range`, evaluated
    /// at the day's offset from `range.from` with the given stability.
    fn accumulate<M: MemoryModel>(&mut self, model: &M, stability: f64, range: DayRange) {
        for day in range.from..range.to {
            let value = model.retrievability((day - range.from) as f64, stability);
            self.add(day, value);
        }
    }

    fn add(&mut self, day: i64, value: f64) {
        // Days before the window (possible only with an unsorted log) are dropped.
        let Ok(index) = usize::try_from(day - self.start_day) else {
            return;
        };
        if index >= self.slots.len() {
            self.slots.resize(index + 1, 0.0);
        }
        self.slots[index] += value;
    }
}

// ==================== Outcome ====================

/// Result of one replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    /// Summed recall probability per day. Index 0 corresponds to
    /// `start_day`; days with no contribution hold `0.0`.
    pub retention_by_day: Vec<f64>,
    /// Day index of the first event; add it back to map slots to calendar days
    pub start_day: i64,
    /// Day index of the end of the analysis window (inclusive)
    pub end_day: i64,
    /// Per-item memory state at the moment the replay finished
    pub final_states: HashMap<ItemId, ItemMemory>,
}

// ==================== Replay Loop ====================

/// Replay a review log against the configured memory models.
///
/// `events` must be non-empty and sorted ascending by timestamp; the engine
/// derives its starting day from the first element and does not validate
/// ordering (an unsorted log yields incorrect day ranges, or a model fault
/// on a negative elapsed interval).
///
/// For each event the engine closes any days skipped since the previous
/// event, then either applies a forget reset (state only, never the
/// retention curve or the stability ledger) or accumulates retrievability
/// for the interval since the item's previous review and advances its state
/// through the model. A finalization pass extends every reviewed item's
/// contribution through the end of the window.
pub fn replay<M: MemoryModel>(
    events: &[ReviewEvent],
    models: &ModelProvider<M>,
    config: &ReplayConfig,
    hooks: &mut ReplayHooks<'_>,
) -> Result<ReplayOutcome, ReplayError> {
    let first = events.first().ok_or(ReplayError::EmptyLog)?;

    let rollover_ms = config.rollover_ms;
    let end = config.end.unwrap_or_else(Utc::now);
    let end_day = day_index(end, rollover_ms);
    let start_day = day_index(first.at, rollover_ms);

    debug!(
        events = events.len(),
        start_day, end_day, rollover_ms, "replaying review log"
    );

    let mut states: HashMap<ItemId, ItemMemory> = HashMap::new();
    let mut ledger: HashMap<ItemId, f64> = HashMap::new();
    let mut retention = RetentionCurve::new(start_day);
    let mut last_event_day = start_day;

    for event in events {
        let today = day_index(event.at, rollover_ms);

        if let Some(hook) = hooks.on_day_end.as_mut() {
            for day in last_event_day..today {
                hook(day, &states, &ledger);
            }
        }
        last_event_day = today;

        match event.grade {
            ReviewGrade::Forgotten => {
                // Forgetting an item that was never seen is a no-op.
                let Some(state) = states.get_mut(&event.item) else {
                    continue;
                };
                let model = models.resolve(event.item)?;
                let reset = model.forget(MemoryState {
                    stability: state.stability,
                    difficulty: state.difficulty,
                });
                state.stability = reset.stability;
                state.difficulty = reset.difficulty;
                state.last_review = Some(event.at);
                if let Some(hook) = hooks.on_forget.as_mut() {
                    hook(event.item, state);
                }
            }
            ReviewGrade::Rated(rating) => {
                let model = models.resolve(event.item)?;
                let state = states.entry(event.item).or_default();

                // The ledger stability anchors the interval since the previous
                // review; a forget reset never rewrites it.
                if let (Some(&anchor), Some(last)) = (ledger.get(&event.item), state.last_review) {
                    let range = DayRange::new(day_index(last, rollover_ms), today);
                    retention.accumulate(model, anchor, range);
                    if let Some(hook) = hooks.on_review_range.as_mut() {
                        hook(anchor, state, range);
                    }
                }

                let prev = state.model_state();
                let elapsed = match state.last_review {
                    Some(last) => (today - day_index(last, rollover_ms)) as f64,
                    None => 0.0,
                };
                let next = model.next_state(prev, elapsed, rating)?;

                state.stability = next.stability;
                state.difficulty = next.difficulty;
                state.last_review = Some(event.at);
                ledger.insert(event.item, next.stability);
            }
        }
    }

    // Finalization: every reviewed item keeps decaying through the end of the
    // window. Accumulation is commutative addition, so map order cannot
    // affect the numeric output (only the hook firing order, which is
    // unspecified).
    debug!(items = states.len(), "finalizing retention through end day");
    for (item, state) in &states {
        let Some(&anchor) = ledger.get(item) else {
            continue;
        };
        let Some(last) = state.last_review else {
            continue;
        };
        let model = models.resolve(*item)?;
        let range = DayRange::new(day_index(last, rollover_ms), end_day + 1);
        retention.accumulate(model, anchor, range);
        if let Some(hook) = hooks.on_review_range.as_mut() {
            hook(anchor, state, range);
        }
    }

    Ok(ReplayOutcome {
        retention_by_day: retention.slots,
        start_day,
        end_day,
        final_states: states,
    })
}

/// [`replay`] without observation hooks.
pub fn replay_simple<M: MemoryModel>(
    events: &[ReviewEvent],
    models: &ModelProvider<M>,
    config: &ReplayConfig,
) -> Result<ReplayOutcome, ReplayError> {
    replay(events, models, config, &mut ReplayHooks::none())
}

// ==================== Tests ====================
