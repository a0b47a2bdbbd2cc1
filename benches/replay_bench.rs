//! Benchmark suite for danci-replay
//!
//! Run with: cargo bench

use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use danci_replay::{
    replay_simple, FsrsModel, ModelProvider, ReplayConfig, ReviewEvent, ReviewGrade, DAY_MS,
};

/// Deterministic synthetic log: `items` cards, `reviews` passes each, review
/// gaps spread pseudo-randomly over 1..=7 days (plain LCG, no RNG crate so
/// the log is identical on every run).
fn synthetic_log(items: i64, reviews: usize) -> Vec<ReviewEvent> {
    let mut seed: u64 = 0x5DEECE66D;
    let mut events = Vec::with_capacity(items as usize * reviews);
    for item in 0..items {
        let mut at_ms = item * 60_000;
        for pass in 0..reviews {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let gap_days = 1 + (seed >> 33) % 7;
            at_ms += gap_days as i64 * DAY_MS;
            let grade = if pass > 0 && seed % 23 == 0 {
                ReviewGrade::Forgotten
            } else {
                ReviewGrade::from_raw(1 + (seed % 4) as i8).unwrap()
            };
            events.push(ReviewEvent::new(item, Utc.timestamp_millis_opt(at_ms).unwrap(), grade));
        }
    }
    events.sort_by_key(|event| event.at);
    events
}

fn bench_replay(c: &mut Criterion) {
    let events = synthetic_log(500, 20);
    let models = ModelProvider::Shared(FsrsModel::new());
    let end = events.last().unwrap().at + chrono::Duration::days(30);
    let config = ReplayConfig::new(0, end);

    c.bench_function("replay 500 items x 20 reviews", |b| {
        b.iter(|| replay_simple(&events, &models, &config).unwrap())
    });
}

criterion_group!(benches, bench_replay);
criterion_main!(benches);
