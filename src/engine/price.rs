//! # engine::price
//!
//! Random-walk price simulator plus the seed series for the price chart.

use chrono::{DateTime, Duration, Utc};

use crate::models::PricePoint;

use super::rng::RandomSource;

/// Total width of the per-tick move: ±0.1 % around the current price.
pub const VOLATILITY: f64 = 0.002;

/// Points kept in the chart series.
pub const HISTORY_CAPACITY: usize = 30;

/// Points generated when an asset is selected.
pub const HISTORY_SEED_LEN: usize = 20;

/// Round to 2 decimal places.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Next simulated price: a uniform multiplicative nudge within ±0.1 %,
/// rounded to cents.
pub fn next_price(current: f64, rng: &mut dyn RandomSource) -> f64 {
    let change = current * (rng.next_f64() * VOLATILITY - VOLATILITY / 2.0);
    round2(current + change)
}

/// Backfill for the chart: [`HISTORY_SEED_LEN`] points one minute apart
/// ending just before `now`, each within ±50 of `baseline`.
pub fn seed_history(
    baseline: f64,
    now: DateTime<Utc>,
    rng: &mut dyn RandomSource,
) -> Vec<PricePoint> {
    (0..HISTORY_SEED_LEN)
        .map(|i| PricePoint {
            time: now - Duration::minutes((HISTORY_SEED_LEN - i) as i64),
            price: round2(baseline + rng.float_range(-50.0, 50.0)),
        })
        .collect()
}
