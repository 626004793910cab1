//! Moving average selected by type at configuration time.

use crate::domain::Candle;
use crate::series::Series;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Ema, Indicator, Sma};

/// Moving average type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaType {
    Sma,
    Ema,
}

impl fmt::Display for MaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaType::Sma => f.write_str("SMA"),
            MaType::Ema => f.write_str("EMA"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum MovingAverage {
    Sma(Sma),
    Ema(Ema),
}

impl MovingAverage {
    pub fn new(ma_type: MaType, period: usize) -> Self {
        match ma_type {
            MaType::Sma => MovingAverage::Sma(Sma::new(period)),
            MaType::Ema => MovingAverage::Ema(Ema::new(period)),
        }
    }

    pub fn ma_type(&self) -> MaType {
        match self {
            MovingAverage::Sma(_) => MaType::Sma,
            MovingAverage::Ema(_) => MaType::Ema,
        }
    }

    pub fn period(&self) -> usize {
        match self {
            MovingAverage::Sma(ma) => ma.period(),
            MovingAverage::Ema(ma) => ma.period(),
        }
    }

    fn inner(&self) -> &dyn Indicator {
        match self {
            MovingAverage::Sma(ma) => ma,
            MovingAverage::Ema(ma) => ma,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Indicator {
        match self {
            MovingAverage::Sma(ma) => ma,
            MovingAverage::Ema(ma) => ma,
        }
    }
}

impl Indicator for MovingAverage {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn warmup_bars(&self) -> usize {
        self.inner().warmup_bars()
    }

    fn update(&mut self, index: usize, candles: &Series<Candle>) -> f64 {
        self.inner_mut().update(index, candles)
    }

    fn value(&self, index: usize) -> f64 {
        self.inner().value(index)
    }

    fn truncate(&mut self, len: usize) {
        self.inner_mut().truncate(len);
    }

    fn clear(&mut self) {
        self.inner_mut().clear();
    }
}
