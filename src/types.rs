//! Common Types and Constants
//!
//! Shared data structures used by the replay engine and the memory models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Length of one calendar day in milliseconds
pub const DAY_MS: i64 = 1000 * 60 * 60 * 24;

/// Raw log encoding of a forgotten card
pub const FORGOTTEN_RAW: i8 = -1;

// ==================== Identifiers ====================

/// Identifier of a tracked item (card). Anki card ids are epoch-millisecond
/// integers, so a signed 64-bit value covers every real log.
pub type ItemId = i64;

// ==================== Ratings ====================

/// Review rating on the standard four-grade scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Rating {
    /// Decode a raw 1-4 rating value
    pub fn from_raw(raw: i8) -> Option<Self> {
        match raw {
            1 => Some(Rating::Again),
            2 => Some(Rating::Hard),
            3 => Some(Rating::Good),
            4 => Some(Rating::Easy),
            _ => None,
        }
    }

    pub fn as_i8(self) -> i8 {
        self as i8
    }
}

/// Grade carried by a review event: a normal rating or the reserved
/// "forgotten" marker used when a card was manually reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewGrade {
    Rated(Rating),
    Forgotten,
}

impl ReviewGrade {
    /// Decode the raw log encoding: `-1` is forgotten, `1..=4` are ratings.
    pub fn from_raw(raw: i8) -> Option<Self> {
        if raw == FORGOTTEN_RAW {
            Some(ReviewGrade::Forgotten)
        } else {
            Rating::from_raw(raw).map(ReviewGrade::Rated)
        }
    }

    pub fn is_forgotten(self) -> bool {
        matches!(self, ReviewGrade::Forgotten)
    }
}

// ==================== Review Events ====================

/// One entry of the historical review log. Immutable input; the engine
/// never mutates the supplied log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewEvent {
    /// Identifier of the reviewed item
    pub item: ItemId,
    /// Instant at which the review was transacted
    pub at: DateTime<Utc>,
    /// Rating given, or the forgotten marker
    pub grade: ReviewGrade,
}

impl ReviewEvent {
    pub fn new(item: ItemId, at: DateTime<Utc>, grade: ReviewGrade) -> Self {
        Self { item, at, grade }
    }

    /// Build an event from the raw integer grade encoding (`-1`, `1..=4`).
    /// Returns `None` for grade values outside the encoding.
    pub fn from_raw(item: ItemId, at: DateTime<Utc>, raw_grade: i8) -> Option<Self> {
        ReviewGrade::from_raw(raw_grade).map(|grade| Self { item, at, grade })
    }
}

// ==================== Memory States ====================

/// The (stability, difficulty) pair exchanged with a memory model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    /// Time scale of the forgetting curve, in days
    pub stability: f64,
    /// Difficulty in the model's own range
    pub difficulty: f64,
}

/// Reconstructed per-item memory state. Created lazily on the item's first
/// event and owned exclusively by the engine for the duration of a replay;
/// the final snapshot is returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemMemory {
    /// Current stability in days; `0.0` until the first graded review, and
    /// again after a forget reset
    pub stability: f64,
    /// Current difficulty; `0.0` until the first graded review
    pub difficulty: f64,
    /// Instant of the most recent event that touched this item (a forget
    /// refreshes it too)
    pub last_review: Option<DateTime<Utc>>,
}

impl ItemMemory {
    /// The model-level state pair, or `None` while the item has no formed
    /// memory (new item, or reset by a forget). A post-forget review is
    /// re-initialized from scratch because of this.
    pub fn model_state(&self) -> Option<MemoryState> {
        (self.stability > 0.0).then_some(MemoryState {
            stability: self.stability,
            difficulty: self.difficulty,
        })
    }
}

// ==================== Day Ranges ====================

/// Half-open range of day indices `[from, to)`. Retrievability samples are
/// emitted for each integer day in the range; an empty range is zero work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub from: i64,
    /// Exclusive upper bound
    pub to: i64,
}

impl DayRange {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    pub fn is_empty(&self) -> bool {
        self.to <= self.from
    }

    /// Number of integer days covered
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            (self.to - self.from) as u64
        }
    }
}

// ==================== Tests ====================
