//! Heiken-Ashi candle transform.
//!
//! ha_close = (o + h + l + c) / 4
//! ha_open  = (o + c) / 2 on bar 0, then (ha_open[i-1] + ha_close[i-1]) / 2
//! ha_high  = max(h, ha_open, ha_close)
//! ha_low   = min(l, ha_open, ha_close)

use crate::domain::Candle;
use crate::series::Series;

#[derive(Debug, Clone, Default)]
pub struct HeikenAshi {
    candles: Series<Candle>,
}

impl HeikenAshi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, index: usize, candle: &Candle) -> Candle {
        let close = candle.ohlc4();
        let open = if index == 0 {
            (candle.open + candle.close) / 2.0
        } else {
            let prev = self.candles.get(index - 1);
            (prev.open + prev.close) / 2.0
        };
        let ha = Candle {
            open,
            high: candle.high.max(open).max(close),
            low: candle.low.min(open).min(close),
            close,
        };
        self.candles.set(index, ha);
        ha
    }

    /// Heiken-Ashi candle at `index` (all zeros if never computed).
    pub fn candle(&self, index: usize) -> Candle {
        self.candles.get(index)
    }

    pub fn series(&self) -> &Series<Candle> {
        &self.candles
    }

    pub fn truncate(&mut self, len: usize) {
        self.candles.truncate(len);
    }

    pub fn clear(&mut self) {
        self.candles.clear();
    }
}
