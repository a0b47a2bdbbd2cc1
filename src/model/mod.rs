//! Memory-model seam and the built-in FSRS model
//!
//! The replay engine treats the memory-strength model as a black box behind
//! [`MemoryModel`]: state transitions and the forgetting curve are delegated,
//! the engine only decides *when* to call them. [`FsrsModel`] is the default
//! implementation (FSRS power forgetting curve, 17-weight parameter vector);
//! per-deck parameter presets are expressed with [`FsrsModel::with_params`]
//! and a [`ModelProvider::PerItem`] mapping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ReplayError;
use crate::types::{ItemId, MemoryState, Rating};

const DECAY: f64 = -0.5;
const FACTOR: f64 = 19.0 / 81.0;

// ==================== Model Seam ====================

/// Memory-strength model driven by the replay engine.
pub trait MemoryModel {
    /// Transition to the state after a graded review. `prev` is `None` for
    /// an item with no formed memory; `elapsed_days` is the whole-day
    /// calendar distance since the previous review (`0.0` if none). A model
    /// may reject out-of-range input; the fault aborts the replay.
    fn next_state(
        &self,
        prev: Option<MemoryState>,
        elapsed_days: f64,
        rating: Rating,
    ) -> Result<MemoryState, ReplayError>;

    /// Forgetting curve: probability of recall `elapsed_days` after a review
    /// that left the given stability. Total; must be non-negative and
    /// non-increasing in `elapsed_days`.
    fn retrievability(&self, elapsed_days: f64, stability: f64) -> f64;

    /// Transition applied on a manual forget. The default resets the pair to
    /// zero so the next review re-initializes the item from scratch.
    fn forget(&self, current: MemoryState) -> MemoryState {
        let _ = current;
        MemoryState {
            stability: 0.0,
            difficulty: 0.0,
        }
    }
}

/// Model configuration for a replay: one shared model for every item, or a
/// per-item mapping (distinct learned parameters per deck/preset). A missing
/// entry in mapping mode is a caller error surfaced as
/// [`ReplayError::MissingModel`]; there is no fallback model.
#[derive(Debug, Clone)]
pub enum ModelProvider<M> {
    Shared(M),
    PerItem(HashMap<ItemId, M>),
}

impl<M: MemoryModel> ModelProvider<M> {
    pub fn resolve(&self, item: ItemId) -> Result<&M, ReplayError> {
        match self {
            ModelProvider::Shared(model) => Ok(model),
            ModelProvider::PerItem(map) => map.get(&item).ok_or(ReplayError::MissingModel(item)),
        }
    }
}

// ==================== FSRS Model ====================

/// FSRS weight vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsrsParams {
    pub w: [f64; 17],
}

impl Default for FsrsParams {
    fn default() -> Self {
        Self {
            w: [
                0.4, 0.6, 2.4, 5.8, // w0-w3: initial stability
                4.93, 0.94, 0.86, 0.01, 1.49, // w4-w8
                0.14, 0.94, 2.18, 0.05, 0.34, // w9-w13
                1.26, 0.29, 2.61, // w14-w16
            ],
        }
    }
}

/// FSRS memory model. Difficulty is kept in the normalized `[0.1, 1.0]`
/// representation (raw FSRS difficulty divided by 10).
#[derive(Debug, Clone, Default)]
pub struct FsrsModel {
    params: FsrsParams,
}

impl FsrsModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: FsrsParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FsrsParams {
        &self.params
    }
}

impl MemoryModel for FsrsModel {
    fn next_state(
        &self,
        prev: Option<MemoryState>,
        elapsed_days: f64,
        rating: Rating,
    ) -> Result<MemoryState, ReplayError> {
        if elapsed_days.is_nan() || elapsed_days < 0.0 {
            return Err(ReplayError::InvalidElapsed {
                elapsed: elapsed_days,
            });
        }

        let w = &self.params.w;
        let rating_val = rating.as_i8() as i32;

        let Some(prev) = prev else {
            return Ok(MemoryState {
                stability: initial_stability(w, rating_val),
                difficulty: initial_difficulty(w, rating_val),
            });
        };

        let retrievability = forgetting_curve(elapsed_days, prev.stability);
        let difficulty = next_difficulty(w, prev.difficulty, rating_val);
        let stability = if rating == Rating::Again {
            next_forget_stability(w, prev.difficulty, prev.stability, retrievability)
        } else {
            next_recall_stability(w, prev.difficulty, prev.stability, retrievability, rating_val)
        };

        Ok(MemoryState {
            stability,
            difficulty,
        })
    }

    fn retrievability(&self, elapsed_days: f64, stability: f64) -> f64 {
        forgetting_curve(elapsed_days, stability)
    }
}

fn forgetting_curve(elapsed_days: f64, stability: f64) -> f64 {
    if stability <= 0.0 {
        return 0.0;
    }
    let safe_elapsed = elapsed_days.max(0.0);
    (1.0 + FACTOR * safe_elapsed / stability).powf(DECAY)
}

fn initial_stability(w: &[f64; 17], rating: i32) -> f64 {
    w[(rating - 1) as usize].max(0.1)
}

fn initial_difficulty(w: &[f64; 17], rating: i32) -> f64 {
    let d = w[4] - (rating - 3) as f64 * w[5];
    d.clamp(1.0, 10.0) / 10.0
}

fn next_difficulty(w: &[f64; 17], d: f64, rating: i32) -> f64 {
    let d_10 = d * 10.0;
    let delta = -(rating - 3) as f64;
    let d_new = d_10 + w[6] * delta;
    let d_mean = w[7] * (w[4] - 3.0 * w[5]) + (1.0 - w[7]) * d_new;
    (d_mean.clamp(1.0, 10.0)) / 10.0
}

fn next_recall_stability(w: &[f64; 17], d: f64, s: f64, r: f64, rating: i32) -> f64 {
    let d_10 = d * 10.0;
    let hard_penalty = if rating == 2 { w[15] } else { 1.0 };
    let easy_bonus = if rating == 4 { w[16] } else { 1.0 };

    let new_s = s
        * (1.0
            + w[8].exp()
                * (11.0 - d_10)
                * s.powf(-w[9])
                * ((1.0 - r) * w[10]).exp_m1()
                * hard_penalty
                * easy_bonus);
    new_s.max(0.1)
}

fn next_forget_stability(w: &[f64; 17], d: f64, s: f64, r: f64) -> f64 {
    let d_10 = d * 10.0;
    let new_s =
        w[11] * d_10.powf(-w[12]) * ((s + 1.0).powf(w[13]) - 1.0) * (1.0 - r).powf(w[14]).exp();
    new_s.clamp(0.1, s)
}

// ==================== Tests ====================
