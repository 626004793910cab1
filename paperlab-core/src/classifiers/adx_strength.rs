//! ADX trend-strength buckets.
//!
//! Strong when ADX >= strong threshold, Medium when ADX >= medium threshold,
//! Weak otherwise. Bars before the ADX warm-up are unclassified.

use crate::domain::{Candle, Strength};
use crate::engine::config::AdxConfig;
use crate::indicators::{Adx, Indicator};
use crate::series::Series;

#[derive(Debug, Clone)]
pub struct AdxStrength {
    adx: Adx,
    medium_threshold: f64,
    strong_threshold: f64,
    buckets: Series<Option<Strength>>,
}

impl AdxStrength {
    pub fn new(config: &AdxConfig) -> Self {
        Self {
            adx: Adx::new(config.period, config.smooth_period),
            medium_threshold: config.medium_threshold,
            strong_threshold: config.strong_threshold,
            buckets: Series::new(),
        }
    }

    pub fn warmup_bars(&self) -> usize {
        self.adx.warmup_bars()
    }

    pub fn update(&mut self, index: usize, candles: &Series<Candle>) -> Option<Strength> {
        let adx = self.adx.update(index, candles);
        if index < self.warmup_bars() {
            return None;
        }
        let strength = Strength::classify(adx, self.medium_threshold, self.strong_threshold);
        self.buckets.set(index, Some(strength));
        Some(strength)
    }

    pub fn adx(&self, index: usize) -> f64 {
        self.adx.value(index)
    }

    pub fn strength(&self, index: usize) -> Option<Strength> {
        self.buckets.get(index)
    }

    pub fn truncate(&mut self, len: usize) {
        self.adx.truncate(len);
        self.buckets.truncate(len);
    }

    pub fn clear(&mut self) {
        self.adx.clear();
        self.buckets.clear();
    }
}
