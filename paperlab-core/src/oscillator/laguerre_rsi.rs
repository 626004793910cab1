//! Laguerre RSI.
//!
//! A four-stage Laguerre cascade is run over the input price, and the RSI is
//! taken across the stages instead of across bars:
//!
//! cu = sum of upward stage differences, cd = sum of downward ones
//! RSI = 100 * cu / (cu + cd), or 0 when cu + cd == 0
//!
//! Two modes:
//! - `Classic`: input is the close, damping is the constant `1 - alpha`.
//!   First value at bar 1.
//! - `FractalEnergy`: input is the Gaussian-smoothed close and the damping
//!   adapts every bar (see `filters::fractal_energy`). First value at bar
//!   `nfe + 4`.

use crate::domain::Candle;
use crate::engine::config::OscillatorConfig;
use crate::filters::{gaussian_alpha, FractalEnergy, GaussianBank, LaguerreCascade};
use crate::series::Series;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OscillatorMode {
    Classic,
    #[default]
    FractalEnergy,
}

/// RSI across the four Laguerre stages. Equal neighbours count as upward.
pub fn rsi_from_stages(stages: [f64; 4]) -> f64 {
    let (cu, cd) = stages
        .windows(2)
        .fold((0.0, 0.0), |(cu, cd), pair| {
            if pair[0] >= pair[1] {
                (cu + pair[0] - pair[1], cd)
            } else {
                (cu, cd + pair[1] - pair[0])
            }
        });
    let total = cu + cd;
    if total != 0.0 {
        100.0 * cu / total
    } else {
        0.0
    }
}

#[derive(Debug, Clone)]
pub struct LaguerreRsi {
    mode: OscillatorMode,
    classic_gamma: f64,
    cascade: LaguerreCascade,
    gaussian: GaussianBank,
    fractal: FractalEnergy,
    values: Series<f64>,
}

impl LaguerreRsi {
    pub fn new(config: &OscillatorConfig) -> Self {
        let classic_gamma = 1.0 - config.alpha;
        Self {
            mode: config.mode,
            classic_gamma,
            cascade: LaguerreCascade::new(),
            gaussian: GaussianBank::new(gaussian_alpha(config.gaussian_length, config.beta_dev)),
            fractal: FractalEnergy::new(config.nfe, classic_gamma),
            values: Series::new(),
        }
    }

    /// First bar with an oscillator value.
    pub fn warmup_bars(&self) -> usize {
        match self.mode {
            OscillatorMode::Classic => 1,
            OscillatorMode::FractalEnergy => self.fractal.warmup_bars(),
        }
    }

    /// Compute bar `index`. Returns `None` while warming up.
    pub fn update(&mut self, index: usize, candle: &Candle) -> Option<f64> {
        let (input, gamma) = match self.mode {
            OscillatorMode::Classic => {
                if index < self.warmup_bars() {
                    return None;
                }
                (candle.close, self.classic_gamma)
            }
            OscillatorMode::FractalEnergy => {
                self.gaussian.update(index, candle);
                let gamma = self.fractal.update(index, &self.gaussian)?;
                (self.gaussian.close.value(index), gamma)
            }
        };

        let stages = self.cascade.update(index, input, gamma);
        let rsi = rsi_from_stages(stages);
        self.values.set(index, rsi);
        Some(rsi)
    }

    /// Stored value at `index`; 0 before warm-up.
    pub fn value(&self, index: usize) -> f64 {
        self.values.get(index)
    }

    /// The value at `index` if it has been computed and is past warm-up.
    pub fn ready_value(&self, index: usize) -> Option<f64> {
        (index >= self.warmup_bars() && index < self.values.len()).then(|| self.values.get(index))
    }

    pub fn stage(&self, stage: usize, index: usize) -> f64 {
        self.cascade.stage(stage, index)
    }

    pub fn gaussian(&self) -> &GaussianBank {
        &self.gaussian
    }

    /// Adaptive damping at `index` (0 in classic mode or before warm-up).
    pub fn fractal_gamma(&self, index: usize) -> f64 {
        self.fractal.value(index)
    }

    pub fn truncate(&mut self, len: usize) {
        self.cascade.truncate(len);
        self.gaussian.truncate(len);
        self.fractal.truncate(len);
        self.values.truncate(len);
    }

    pub fn clear(&mut self) {
        self.cascade.clear();
        self.gaussian.clear();
        self.fractal.clear();
        self.values.clear();
    }
}
