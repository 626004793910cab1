//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices. While fewer than `period` closes exist the
//! mean is taken over the closes available, so the average is defined from
//! the first bar.

use crate::domain::Candle;
use crate::series::Series;

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
    values: Series<f64>,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
            values: Series::new(),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_bars(&self) -> usize {
        0
    }

    fn update(&mut self, index: usize, candles: &Series<Candle>) -> f64 {
        let start = (index + 1).saturating_sub(self.period);
        let count = index + 1 - start;
        let sum: f64 = (start..=index).map(|i| candles.get(i).close).sum();
        let sma = sum / count as f64;
        self.values.set(index, sma);
        sma
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
