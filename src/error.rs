//! Replay failure taxonomy
//!
//! Either the full log replays and a complete result is returned, or the
//! call fails with one of these and no partial state is exposed.

use thiserror::Error;

use crate::types::ItemId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplayError {
    /// An empty log has no defined starting day
    #[error("review log is empty; no starting day can be derived")]
    EmptyLog,

    /// Per-item model mapping has no entry for an item present in the log
    #[error("no memory model configured for item {0}")]
    MissingModel(ItemId),

    /// The memory model rejected an elapsed-day value
    #[error("elapsed days must be non-negative, got {elapsed}")]
    InvalidElapsed { elapsed: f64 },
}
