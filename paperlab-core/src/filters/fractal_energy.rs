//! Fractal-energy adaptive damping factor.
//!
//! Over a window of `N` Gaussian-smoothed candles:
//!
//! range(k) = max(gH[k], gC[k-1]) - min(gL[k], gC[k-1])
//! span(i)  = highest(gH, i, N) - lowest(gL, i, N)
//! g[i]     = ln(sum(range(i-N+1..=i)) / span(i)) / ln(N)
//!
//! Choppy windows (ranges that overlap a lot) push `g` up and slow the
//! Laguerre cascade down; clean trends push it towards 0.

use crate::series::Series;

use super::gaussian::{GaussianBank, GAUSSIAN_WARMUP};

#[derive(Debug, Clone)]
pub struct FractalEnergy {
    window: usize,
    fallback: f64,
    gamma: Series<f64>,
}

impl FractalEnergy {
    /// `fallback` is used when the very first computed value is degenerate.
    pub fn new(window: usize, fallback: f64) -> Self {
        Self {
            window,
            fallback,
            gamma: Series::new(),
        }
    }

    /// First bar with a value: every Gaussian slot the window reads is past
    /// its own warm-up.
    pub fn warmup_bars(&self) -> usize {
        self.window + GAUSSIAN_WARMUP
    }

    /// Compute `g` at `index` from the smoothed candles; `None` during warm-up.
    pub fn update(&mut self, index: usize, bank: &GaussianBank) -> Option<f64> {
        if index < self.warmup_bars() {
            return None;
        }

        let high = bank.high.series();
        let low = bank.low.series();
        let close = bank.close.series();

        let start = index + 1 - self.window;
        let sum: f64 = (start..=index)
            .map(|k| {
                let prev_close = close.get(k - 1);
                high.get(k).max(prev_close) - low.get(k).min(prev_close)
            })
            .sum();
        let span = high.highest(index, self.window) - low.lowest(index, self.window);

        let raw = (sum / span).ln() / (self.window as f64).ln();
        let gamma = if sum > 0.0 && span > 0.0 && self.window > 1 && raw.is_finite() {
            raw
        } else {
            self.fallback_for(index)
        };

        self.gamma.set(index, gamma);
        Some(gamma)
    }

    fn fallback_for(&self, index: usize) -> f64 {
        if index > self.warmup_bars() {
            self.gamma.get(index - 1)
        } else {
            self.fallback
        }
    }

    pub fn value(&self, index: usize) -> f64 {
        self.gamma.get(index)
    }

    pub fn truncate(&mut self, len: usize) {
        self.gamma.truncate(len);
    }

    pub fn clear(&mut self) {
        self.gamma.clear();
    }
}
