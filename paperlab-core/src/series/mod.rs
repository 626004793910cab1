//! Bar Series Store: index-addressed sequences, one slot per bar.
//!
//! Every component owns the series it writes; downstream components read them
//! by bar index. Unset slots (and reads past the end) return `T::default()`,
//! which gives the "warm-up reads as zero" convention for free.

mod key;

pub use key::{BandKey, SeriesKey, UnknownSeriesKey};

use serde::{Deserialize, Serialize};

/// Append-mostly, index-addressed sequence of per-bar values.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T> {
    values: Vec<T>,
}

impl<T> Default for Series<T> {
    fn default() -> Self {
        Self { values: Vec::new() }
    }
}

impl<T: Copy + Default> Series<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write slot `index`, extending storage with defaults if needed.
    pub fn set(&mut self, index: usize, value: T) {
        if index >= self.values.len() {
            self.values.resize(index + 1, T::default());
        }
        self.values[index] = value;
    }

    /// Value at `index`, or the default when the slot was never written.
    pub fn get(&self, index: usize) -> T {
        self.values.get(index).copied().unwrap_or_default()
    }

    /// Value `lag` bars before `index`; the default when that reaches before bar 0.
    pub fn prior(&self, index: usize, lag: usize) -> T {
        index
            .checked_sub(lag)
            .map(|i| self.get(i))
            .unwrap_or_default()
    }

    /// Drop every slot at or after `len`.
    pub fn truncate(&mut self, len: usize) {
        self.values.truncate(len);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of slots (the highest written index + 1).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl Series<f64> {
    /// Maximum over the `window` slots ending at `index` (inclusive).
    pub fn highest(&self, index: usize, window: usize) -> f64 {
        self.window(index, window).fold(f64::NEG_INFINITY, f64::max)
    }

    /// Minimum over the `window` slots ending at `index` (inclusive).
    pub fn lowest(&self, index: usize, window: usize) -> f64 {
        self.window(index, window).fold(f64::INFINITY, f64::min)
    }

    fn window(&self, index: usize, window: usize) -> impl Iterator<Item = f64> + '_ {
        let start = (index + 1).saturating_sub(window.max(1));
        (start..=index).map(move |i| self.get(i))
    }
}

/// Upper/lower pair for range-band series (clouds, overbought/oversold zones).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub upper: f64,
    pub lower: f64,
}

impl Band {
    pub fn new(upper: f64, lower: f64) -> Self {
        Self { upper, lower }
    }
}
