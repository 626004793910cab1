//! Four-pole Gaussian smoother.
//!
//! G[i] = a^4 x[i] + 4(1-a) G[i-1] - 6(1-a)^2 G[i-2] + 4(1-a)^3 G[i-3] - (1-a)^4 G[i-4]
//!
//! The filter starts from a zero state: bars 0..=3 are left at 0 and the first
//! filtered value is written at bar 4.

use crate::domain::Candle;
use crate::series::Series;
use std::f64::consts::PI;

/// First bar index a Gaussian filter writes.
pub const GAUSSIAN_WARMUP: usize = 4;

/// Smoothing coefficient derived from the filter length and reactivity.
///
/// w = 2pi / length, b = (1 - cos w) / (1.414^(2 / beta_dev) - 1),
/// a = -b + sqrt(b^2 + 2b).
pub fn gaussian_alpha(gaussian_length: usize, beta_dev: usize) -> f64 {
    let w = 2.0 * PI / gaussian_length as f64;
    let beta = (1.0 - w.cos()) / (1.414_f64.powf(2.0 / beta_dev as f64) - 1.0);
    -beta + (beta * beta + 2.0 * beta).sqrt()
}

/// Pre-expanded filter taps for a given `alpha`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianCoefficients {
    pub input: f64,
    pub feedback: [f64; 4],
}

impl GaussianCoefficients {
    pub fn new(alpha: f64) -> Self {
        let d = 1.0 - alpha;
        Self {
            input: alpha.powi(4),
            feedback: [4.0 * d, -6.0 * d.powi(2), 4.0 * d.powi(3), -d.powi(4)],
        }
    }
}

#[derive(Debug, Clone)]
pub struct GaussianFilter {
    coefficients: GaussianCoefficients,
    output: Series<f64>,
}

impl GaussianFilter {
    pub fn new(alpha: f64) -> Self {
        Self {
            coefficients: GaussianCoefficients::new(alpha),
            output: Series::new(),
        }
    }

    pub fn update(&mut self, index: usize, x: f64) -> f64 {
        if index < GAUSSIAN_WARMUP {
            self.output.set(index, 0.0);
            return 0.0;
        }
        let c = &self.coefficients;
        let value = c.input * x
            + c.feedback
                .iter()
                .enumerate()
                .map(|(lag, tap)| tap * self.output.prior(index, lag + 1))
                .sum::<f64>();
        self.output.set(index, value);
        value
    }

    pub fn value(&self, index: usize) -> f64 {
        self.output.get(index)
    }

    pub fn series(&self) -> &Series<f64> {
        &self.output
    }

    pub fn truncate(&mut self, len: usize) {
        self.output.truncate(len);
    }

    pub fn clear(&mut self) {
        self.output.clear();
    }
}

/// One Gaussian filter per candle price.
#[derive(Debug, Clone)]
pub struct GaussianBank {
    pub open: GaussianFilter,
    pub high: GaussianFilter,
    pub low: GaussianFilter,
    pub close: GaussianFilter,
}

impl GaussianBank {
    pub fn new(alpha: f64) -> Self {
        Self {
            open: GaussianFilter::new(alpha),
            high: GaussianFilter::new(alpha),
            low: GaussianFilter::new(alpha),
            close: GaussianFilter::new(alpha),
        }
    }

    pub fn update(&mut self, index: usize, candle: &Candle) {
        self.open.update(index, candle.open);
        self.high.update(index, candle.high);
        self.low.update(index, candle.low);
        self.close.update(index, candle.close);
    }

    pub fn truncate(&mut self, len: usize) {
        for filter in [&mut self.open, &mut self.high, &mut self.low, &mut self.close] {
            filter.truncate(len);
        }
    }

    pub fn clear(&mut self) {
        for filter in [&mut self.open, &mut self.high, &mut self.low, &mut self.close] {
            filter.clear();
        }
    }
}
