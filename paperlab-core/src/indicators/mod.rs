//! Incremental indicators.
//!
//! Every indicator implements [`Indicator`]: it is fed one bar at a time in
//! increasing index order and keeps its output in a [`Series`]. Revising the
//! last bar is `truncate(index)` followed by `update(index, ..)`, which
//! recomputes that bar from the untouched history before it.
//!
//! Heiken-Ashi is a candle transform rather than a scalar series, so it has
//! its own API instead of the trait.

pub mod adx;
pub mod ema;
pub mod heiken_ashi;
pub mod moving_average;
pub mod sma;

pub use adx::{true_range, Adx};
pub use ema::Ema;
pub use heiken_ashi::HeikenAshi;
pub use moving_average::{MaType, MovingAverage};
pub use sma::Sma;

use crate::domain::Candle;
use crate::series::Series;

/// A single-series indicator updated bar by bar.
///
/// # Look-ahead guard
/// The value at bar `i` may only read candles `0..=i`. Every indicator must
/// produce the same values on a truncated history as on the full one.
pub trait Indicator: Send {
    /// Human-readable name (e.g., "ema_9", "adx_14_14").
    fn name(&self) -> &str;

    /// First bar index with a meaningful value. Earlier slots read as 0.
    fn warmup_bars(&self) -> usize;

    /// Compute bar `index` from `candles[0..=index]` and return its value.
    fn update(&mut self, index: usize, candles: &Series<Candle>) -> f64;

    /// Stored value at `index` (0 if never computed).
    fn value(&self, index: usize) -> f64;

    /// Forget every bar at or after `len`.
    fn truncate(&mut self, len: usize);

    fn clear(&mut self);
}

/// Create synthetic candles from close prices for testing.
///
/// open = prev_close (or close for the first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Series<Candle> {
    let mut series = Series::new();
    for (i, &close) in closes.iter().enumerate() {
        let open = if i == 0 { close } else { closes[i - 1] };
        let high = open.max(close) + 1.0;
        let low = open.min(close) - 1.0;
        series.set(i, Candle::new(open, high, low, close));
    }
    series
}

/// Feed every candle through `indicator` and collect the outputs.
#[cfg(test)]
pub fn run_indicator<I: Indicator>(indicator: &mut I, candles: &Series<Candle>) -> Vec<f64> {
    (0..candles.len())
        .map(|i| indicator.update(i, candles))
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
