//! Moving-average cloud: fast vs slow average with a held trend direction.
//!
//! From bar 1:
//! - label is Bullish when fast > slow, Bearish when fast < slow, else Neutral
//! - the held direction keeps the last strict label through Neutral bars
//! - a crossover is marked where the held direction first appears or flips
//! - the bullish band `{fast, slow}` covers bars where fast >= slow or the
//!   previous bar had fast > slow; the bearish band `{slow, fast}` mirrors it.
//!   Crossover bars belong to both, so the two clouds join up when drawn.

use crate::domain::{Candle, CloudTrend, Trend};
use crate::engine::config::MaCloudConfig;
use crate::indicators::{Indicator, MovingAverage};
use crate::series::{Band, Series};

#[derive(Debug, Clone)]
pub struct MaCloud {
    fast: MovingAverage,
    slow: MovingAverage,
    trends: Series<Option<CloudTrend>>,
    held: Series<Option<Trend>>,
    crossovers: Series<Option<Trend>>,
    bullish: Series<Option<Band>>,
    bearish: Series<Option<Band>>,
}

impl MaCloud {
    pub fn new(config: &MaCloudConfig) -> Self {
        assert!(
            config.slow_period > config.fast_period,
            "slow_period must be > fast_period"
        );
        Self {
            fast: MovingAverage::new(config.ma_type, config.fast_period),
            slow: MovingAverage::new(config.ma_type, config.slow_period),
            trends: Series::new(),
            held: Series::new(),
            crossovers: Series::new(),
            bullish: Series::new(),
            bearish: Series::new(),
        }
    }

    pub fn update(&mut self, index: usize, candles: &Series<Candle>) -> Option<CloudTrend> {
        let fast = self.fast.update(index, candles);
        let slow = self.slow.update(index, candles);
        if index == 0 {
            return None;
        }

        let trend = CloudTrend::from_averages(fast, slow);
        self.trends.set(index, Some(trend));

        let prev_held = self.held.get(index - 1);
        let held = trend.direction().or(prev_held);
        self.held.set(index, held);
        if held.is_some() && held != prev_held {
            self.crossovers.set(index, held);
        }

        let prev_fast = self.fast.value(index - 1);
        let prev_slow = self.slow.value(index - 1);
        if fast >= slow || prev_fast > prev_slow {
            self.bullish.set(index, Some(Band::new(fast, slow)));
        }
        if fast <= slow || prev_fast < prev_slow {
            self.bearish.set(index, Some(Band::new(slow, fast)));
        }

        Some(trend)
    }

    pub fn fast(&self, index: usize) -> f64 {
        self.fast.value(index)
    }

    pub fn slow(&self, index: usize) -> f64 {
        self.slow.value(index)
    }

    pub fn trend(&self, index: usize) -> Option<CloudTrend> {
        self.trends.get(index)
    }

    /// Last strict direction at or before `index`.
    pub fn direction(&self, index: usize) -> Option<Trend> {
        self.held.get(index)
    }

    /// The direction the cloud switched to at `index`, if it switched there.
    pub fn crossover(&self, index: usize) -> Option<Trend> {
        self.crossovers.get(index)
    }

    pub fn bullish_band(&self, index: usize) -> Option<Band> {
        self.bullish.get(index)
    }

    pub fn bearish_band(&self, index: usize) -> Option<Band> {
        self.bearish.get(index)
    }

    pub fn truncate(&mut self, len: usize) {
        self.fast.truncate(len);
        self.slow.truncate(len);
        self.trends.truncate(len);
        self.held.truncate(len);
        self.crossovers.truncate(len);
        self.bullish.truncate(len);
        self.bearish.truncate(len);
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }
}
