//! Four-stage Laguerre cascade.
//!
//! L0[i] = (1 - g) * x[i] + g * L0[i-1]
//! Lk[i] = -g * Lk-1[i] + Lk-1[i-1] + g * Lk[i-1]      (k = 1..3)
//!
//! Stages are evaluated left to right, so stage k reads the current-bar value
//! of stage k-1. Slots before the first update read as 0.

use crate::series::Series;

pub const STAGES: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct LaguerreCascade {
    stages: [Series<f64>; STAGES],
}

impl LaguerreCascade {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the cascade at `index` with input `x` and damping factor `gamma`.
    pub fn update(&mut self, index: usize, x: f64, gamma: f64) -> [f64; STAGES] {
        let l0 = (1.0 - gamma) * x + gamma * self.stages[0].prior(index, 1);
        self.stages[0].set(index, l0);

        for k in 1..STAGES {
            let below = self.stages[k - 1].get(index);
            let below_prev = self.stages[k - 1].prior(index, 1);
            let prev = self.stages[k].prior(index, 1);
            self.stages[k].set(index, -gamma * below + below_prev + gamma * prev);
        }

        self.values(index)
    }

    /// All four stage values at `index`.
    pub fn values(&self, index: usize) -> [f64; STAGES] {
        [
            self.stages[0].get(index),
            self.stages[1].get(index),
            self.stages[2].get(index),
            self.stages[3].get(index),
        ]
    }

    /// Value of stage `stage` (0..=3) at `index`.
    pub fn stage(&self, stage: usize, index: usize) -> f64 {
        self.stages.get(stage).map_or(0.0, |s| s.get(index))
    }

    pub fn truncate(&mut self, len: usize) {
        self.stages.iter_mut().for_each(|s| s.truncate(len));
    }

    pub fn clear(&mut self) {
        self.stages.iter_mut().for_each(Series::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn first_update_from_zero_state() {
        // g = 0.8, x = 10
        // L0 = 0.2 * 10 = 2.0
        // L1 = -0.8 * 2.0 + 0 + 0 = -1.6
        // L2 = -0.8 * -1.6 = 1.28
        // L3 = -0.8 * 1.28 = -1.024
        let mut cascade = LaguerreCascade::new();
        let v = cascade.update(1, 10.0, 0.8);
        assert_approx(v[0], 2.0, DEFAULT_EPSILON);
        assert_approx(v[1], -1.6, DEFAULT_EPSILON);
        assert_approx(v[2], 1.28, DEFAULT_EPSILON);
        assert_approx(v[3], -1.024, DEFAULT_EPSILON);
        assert_eq!(cascade.values(0), [0.0; 4]);
    }

    #[test]
    fn second_update_reads_previous_bar() {
        let mut cascade = LaguerreCascade::new();
        cascade.update(1, 10.0, 0.8);
        let v = cascade.update(2, 10.0, 0.8);
        // L0 = 2.0 + 0.8 * 2.0 = 3.6
        // L1 = -0.8 * 3.6 + 2.0 + 0.8 * -1.6 = -2.16
        assert_approx(v[0], 3.6, DEFAULT_EPSILON);
        assert_approx(v[1], -2.16, DEFAULT_EPSILON);
        assert_approx(cascade.stage(1, 2), -2.16, DEFAULT_EPSILON);
    }

    #[test]
    fn constant_input_converges_all_stages() {
        let mut cascade = LaguerreCascade::new();
        let mut last = [0.0; STAGES];
        for i in 1..400 {
            last = cascade.update(i, 50.0, 0.5);
        }
        for v in last {
            assert_approx(v, 50.0, 1e-6);
        }
    }

    #[test]
    fn truncate_then_update_matches_fresh_run() {
        let inputs = [10.0, 11.0, 12.5, 12.0, 13.0];
        let mut fresh = LaguerreCascade::new();
        for (i, &x) in inputs.iter().enumerate() {
            fresh.update(i, x, 0.6);
        }

        let mut revised = LaguerreCascade::new();
        for (i, &x) in inputs.iter().enumerate() {
            revised.update(i, x, 0.6);
        }
        revised.truncate(4);
        revised.update(4, 99.0, 0.6);
        revised.truncate(4);
        revised.update(4, 13.0, 0.6);

        assert_eq!(fresh.values(4), revised.values(4));
    }
}
