//! Heiken-Ashi candle direction and the three-state trend dot.

use crate::domain::{Candle, Trend, TrendDot};
use crate::series::Series;

#[derive(Debug, Clone, Default)]
pub struct CandleTrend {
    trends: Series<Option<Trend>>,
    dots: Series<Option<TrendDot>>,
}

impl CandleTrend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify the Heiken-Ashi candle at `index`. The dot needs a previous
    /// candle, so bar 0 only gets a direction.
    pub fn update(&mut self, index: usize, ha: &Candle) -> Option<TrendDot> {
        let trend = Trend::from_open_close(ha.open, ha.close);
        self.trends.set(index, Some(trend));

        let prev = index.checked_sub(1).and_then(|p| self.trends.get(p))?;
        let dot = TrendDot::from_pair(prev, trend);
        self.dots.set(index, Some(dot));
        Some(dot)
    }

    pub fn trend(&self, index: usize) -> Option<Trend> {
        self.trends.get(index)
    }

    pub fn dot(&self, index: usize) -> Option<TrendDot> {
        self.dots.get(index)
    }

    /// True when bars `index-1` and `index` are both `target` and bar
    /// `index-2` was not: the trend has just come back to `target`.
    pub fn returning_to(&self, index: usize, target: Trend) -> bool {
        if index < 2 {
            return false;
        }
        let t0 = self.trend(index);
        let t1 = self.trend(index - 1);
        let t2 = self.trend(index - 2);
        t0 == Some(target) && t1 == Some(target) && t2.is_some() && t2 != t1
    }

    pub fn truncate(&mut self, len: usize) {
        self.trends.truncate(len);
        self.dots.truncate(len);
    }

    pub fn clear(&mut self) {
        self.trends.clear();
        self.dots.clear();
    }
}
