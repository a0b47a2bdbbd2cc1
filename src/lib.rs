//! # danci-replay - Historical replay engine for review logs
//!
//! This crate replays a chronological log of spaced-repetition review events
//! against a memory-strength model and reconstructs, per item, the memory
//! state (stability, difficulty, last review) it had at every point in
//! history, together with a population-level retention curve over calendar
//! days. It retrofits analytics onto data collected under a live scheduler
//! without re-running the scheduler: a pure function from (event log, model
//! configuration) to (retention series, final states).
//!
//! Design goals:
//! - **Pure Rust** - no runtime services; one synchronous call per analysis
//! - **Deterministic** - identical inputs produce bit-identical output
//! - **Model-agnostic** - the memory model is a trait; FSRS ships built in
//!
//! Module structure:
//!
//! - [`replay`] - the replay engine (day clock, state machine, retention accumulator, hooks)
//! - [`model`] - the [`model::MemoryModel`] seam and the built-in FSRS model
//! - [`types`] - review events, grades, memory states, day ranges
//! - [`error`] - failure taxonomy
//!
//! Example:
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use danci_replay::{
//!     replay_simple, FsrsModel, ModelProvider, Rating, ReplayConfig, ReviewEvent, ReviewGrade,
//! };
//!
//! let day = 86_400_000;
//! let events = vec![
//!     ReviewEvent::new(1, Utc.timestamp_millis_opt(0).unwrap(), ReviewGrade::Rated(Rating::Good)),
//!     ReviewEvent::new(1, Utc.timestamp_millis_opt(5 * day).unwrap(), ReviewGrade::Rated(Rating::Good)),
//! ];
//! let models = ModelProvider::Shared(FsrsModel::new());
//! let config = ReplayConfig::new(0, Utc.timestamp_millis_opt(7 * day).unwrap());
//!
//! let outcome = replay_simple(&events, &models, &config).unwrap();
//! assert_eq!(outcome.retention_by_day.len(), 8);
//! ```

#![deny(clippy::all)]

// ============================================================================
// 模块声明
// ============================================================================

pub mod error;
pub mod model;
pub mod replay;
pub mod types;

// 重新导出主要类型和函数
pub use error::ReplayError;
pub use model::{FsrsModel, FsrsParams, MemoryModel, ModelProvider};
pub use replay::{
    day_index, replay, replay_simple, DayEndHook, ForgetHook, ReplayConfig, ReplayHooks,
    ReplayOutcome, ReviewRangeHook,
};
pub use types::{
    DayRange, ItemId, ItemMemory, MemoryState, Rating, ReviewEvent, ReviewGrade, DAY_MS,
};
