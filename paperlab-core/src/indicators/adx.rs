//! ADX - Average Directional Index (Wilder).
//!
//! Steps, evaluated bar by bar:
//! 1. +DM, -DM and true range from consecutive candles (from bar 1)
//! 2. Wilder-smooth them over `period` (seed: mean of bars 1..=period)
//! 3. +DI = 100 * sm(+DM) / sm(TR), -DI = 100 * sm(-DM) / sm(TR)
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 5. ADX = DX Wilder-smoothed over `smooth_period`
//!
//! First ADX value at bar `period + smooth_period - 1`.

use crate::domain::Candle;
use crate::series::Series;

use super::Indicator;

/// max(high - low, |high - prev_close|, |low - prev_close|)
pub fn true_range(candle: &Candle, prev_close: f64) -> f64 {
    (candle.high - candle.low)
        .max((candle.high - prev_close).abs())
        .max((candle.low - prev_close).abs())
}

/// One Wilder step: prev + (x - prev) / period.
fn wilder_step(prev: f64, x: f64, period: usize) -> f64 {
    prev + (x - prev) / period as f64
}

fn mean(series: &Series<f64>, first: usize, last: usize) -> f64 {
    let sum: f64 = (first..=last).map(|i| series.get(i)).sum();
    sum / (last + 1 - first) as f64
}

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    smooth_period: usize,
    name: String,
    tr: Series<f64>,
    plus_dm: Series<f64>,
    minus_dm: Series<f64>,
    smooth_tr: Series<f64>,
    smooth_plus_dm: Series<f64>,
    smooth_minus_dm: Series<f64>,
    dx: Series<f64>,
    adx: Series<f64>,
}

impl Adx {
    pub fn new(period: usize, smooth_period: usize) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        assert!(smooth_period >= 1, "ADX smooth period must be >= 1");
        Self {
            period,
            smooth_period,
            name: format!("adx_{period}_{smooth_period}"),
            tr: Series::new(),
            plus_dm: Series::new(),
            minus_dm: Series::new(),
            smooth_tr: Series::new(),
            smooth_plus_dm: Series::new(),
            smooth_minus_dm: Series::new(),
            dx: Series::new(),
            adx: Series::new(),
        }
    }

    fn series_mut(&mut self) -> [&mut Series<f64>; 8] {
        [
            &mut self.tr,
            &mut self.plus_dm,
            &mut self.minus_dm,
            &mut self.smooth_tr,
            &mut self.smooth_plus_dm,
            &mut self.smooth_minus_dm,
            &mut self.dx,
            &mut self.adx,
        ]
    }

    fn directional_movement(&mut self, index: usize, candles: &Series<Candle>) {
        let curr = candles.get(index);
        let prev = candles.get(index - 1);
        let up = curr.high - prev.high;
        let down = prev.low - curr.low;

        self.plus_dm
            .set(index, if up > down && up > 0.0 { up } else { 0.0 });
        self.minus_dm
            .set(index, if down > up && down > 0.0 { down } else { 0.0 });
        self.tr.set(index, true_range(&curr, prev.close));
    }

    fn smooth_directional(&mut self, index: usize) {
        let p = self.period;
        if index == p {
            self.smooth_tr.set(index, mean(&self.tr, 1, p));
            self.smooth_plus_dm.set(index, mean(&self.plus_dm, 1, p));
            self.smooth_minus_dm.set(index, mean(&self.minus_dm, 1, p));
        } else {
            let tr = wilder_step(self.smooth_tr.get(index - 1), self.tr.get(index), p);
            let pdm = wilder_step(self.smooth_plus_dm.get(index - 1), self.plus_dm.get(index), p);
            let mdm = wilder_step(self.smooth_minus_dm.get(index - 1), self.minus_dm.get(index), p);
            self.smooth_tr.set(index, tr);
            self.smooth_plus_dm.set(index, pdm);
            self.smooth_minus_dm.set(index, mdm);
        }

        let str_ = self.smooth_tr.get(index);
        let dx = if str_ == 0.0 {
            0.0
        } else {
            let plus_di = 100.0 * self.smooth_plus_dm.get(index) / str_;
            let minus_di = 100.0 * self.smooth_minus_dm.get(index) / str_;
            let di_sum = plus_di + minus_di;
            if di_sum == 0.0 {
                0.0
            } else {
                100.0 * (plus_di - minus_di).abs() / di_sum
            }
        };
        self.dx.set(index, dx);
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_bars(&self) -> usize {
        self.period + self.smooth_period - 1
    }

    fn update(&mut self, index: usize, candles: &Series<Candle>) -> f64 {
        if index == 0 {
            return 0.0;
        }
        self.directional_movement(index, candles);

        if index < self.period {
            return 0.0;
        }
        self.smooth_directional(index);

        let first = self.warmup_bars();
        if index < first {
            return 0.0;
        }
        let adx = if index == first {
            mean(&self.dx, self.period, first)
        } else {
            wilder_step(self.adx.get(index - 1), self.dx.get(index), self.smooth_period)
        };
        self.adx.set(index, adx);
        adx
    }

    fn value(&self, index: usize) -> f64 {
        self.adx.get(index)
    }

    fn truncate(&mut self, len: usize) {
        self.series_mut().into_iter().for_each(|s| s.truncate(len));
    }

    fn clear(&mut self) {
        self.series_mut().into_iter().for_each(|s| s.clear());
    }
}
