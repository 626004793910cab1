//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1)
//! Seed: EMA[0] = close[0], so the average is defined from the first bar.

use crate::domain::Candle;
use crate::series::Series;

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: f64,
    name: String,
    values: Series<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            name: format!("ema_{period}"),
            values: Series::new(),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Advance with an arbitrary input value rather than a candle close.
    pub fn update_value(&mut self, index: usize, x: f64) -> f64 {
        let ema = if index == 0 {
            x
        } else {
            self.alpha * x + (1.0 - self.alpha) * self.values.get(index - 1)
        };
        self.values.set(index, ema);
        ema
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_bars(&self) -> usize {
        0
    }

    fn update(&mut self, index: usize, candles: &Series<Candle>) -> f64 {
        self.update_value(index, candles.get(index).close)
    }

    fn value(&self, index: usize) -> f64 {
        self.values.get(index)
    }

    fn truncate(&mut self, len: usize) {
        self.values.truncate(len);
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}
