//! Close crossing a single moving average.
//!
//! Buy when close[i-1] <= ma[i-1] and close[i] > ma[i]; sell when
//! close[i-1] >= ma[i-1] and close[i] < ma[i]. Evaluated from bar `period`.

use crate::domain::{Candle, Direction};
use crate::engine::config::PriceCrossConfig;
use crate::indicators::{Indicator, MaType, MovingAverage};
use crate::series::Series;

#[derive(Debug, Clone)]
pub struct PriceCross {
    ma: MovingAverage,
    crosses: Series<Option<Direction>>,
}

impl PriceCross {
    pub fn new(config: &PriceCrossConfig) -> Self {
        Self {
            ma: MovingAverage::new(config.ma_type, config.period),
            crosses: Series::new(),
        }
    }

    pub fn period(&self) -> usize {
        self.ma.period()
    }

    pub fn ma_type(&self) -> MaType {
        self.ma.ma_type()
    }

    pub fn update(&mut self, index: usize, candles: &Series<Candle>) -> Option<Direction> {
        let ma = self.ma.update(index, candles);
        if index < self.period() {
            return None;
        }

        let close = candles.get(index).close;
        let prev_close = candles.get(index - 1).close;
        let prev_ma = self.ma.value(index - 1);

        let cross = if prev_close <= prev_ma && close > ma {
            Some(Direction::Long)
        } else if prev_close >= prev_ma && close < ma {
            Some(Direction::Short)
        } else {
            None
        };
        self.crosses.set(index, cross);
        cross
    }

    pub fn ma(&self, index: usize) -> f64 {
        self.ma.value(index)
    }

    pub fn cross(&self, index: usize) -> Option<Direction> {
        self.crosses.get(index)
    }

    pub fn truncate(&mut self, len: usize) {
        self.ma.truncate(len);
        self.crosses.truncate(len);
    }

    pub fn clear(&mut self) {
        self.ma.clear();
        self.crosses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_candles;

    fn sma(period: usize) -> PriceCross {
        PriceCross::new(&PriceCrossConfig {
            period,
            ma_type: MaType::Sma,
            ..PriceCrossConfig::default()
        })
    }

    fn run(pc: &mut PriceCross, closes: &[f64]) {
        let candles = make_candles(closes);
        for i in 0..candles.len() {
            pc.update(i, &candles);
        }
    }

    #[test]
    fn detects_cross_above_and_below() {
        // SMA(2): 10, 10, 10, 11, 10.5, 9.5
        let mut pc = sma(2);
        run(&mut pc, &[10.0, 10.0, 10.0, 12.0, 9.0, 10.0]);
        assert_eq!(pc.cross(2), None);
        assert_eq!(pc.cross(3), Some(Direction::Long));
        assert_eq!(pc.cross(4), Some(Direction::Short));
        assert_eq!(pc.cross(5), Some(Direction::Long));
    }

    #[test]
    fn nothing_before_period() {
        let mut pc = sma(3);
        run(&mut pc, &[10.0, 20.0, 5.0, 30.0]);
        assert_eq!(pc.cross(1), None);
        assert_eq!(pc.cross(2), None);
        assert!(pc.cross(3).is_some());
    }
}
