use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Instrument metadata: identity and tick size.
///
/// The engine treats a missing instrument as "not ready": indicator series are
/// still computed, but no signal markers or events are produced until metadata
/// is supplied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instrument {
    pub symbol: String,
    pub tick_size: f64,
}

impl Instrument {
    /// Create a new instrument, rejecting non-positive or non-finite tick sizes.
    pub fn new(symbol: impl Into<String>, tick_size: f64) -> Result<Self, InstrumentError> {
        if !tick_size.is_finite() || tick_size <= 0.0 {
            return Err(InstrumentError::InvalidTickSize { tick_size });
        }
        Ok(Self {
            symbol: symbol.into(),
            tick_size,
        })
    }

    /// Price offset of `ticks` whole ticks.
    pub fn ticks(&self, ticks: u32) -> f64 {
        f64::from(ticks) * self.tick_size
    }

    /// Round price to the nearest tick.
    pub fn round_price(&self, price: f64) -> f64 {
        (price / self.tick_size).round() * self.tick_size
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum InstrumentError {
    #[error("tick_size must be positive and finite, got {tick_size}")]
    InvalidTickSize { tick_size: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_offsets() {
        let inst = Instrument::new("ES", 0.25).unwrap();
        assert_eq!(inst.ticks(0), 0.0);
        assert_eq!(inst.ticks(4), 1.0);
        assert_eq!(inst.ticks(7), 1.75);
    }

    #[test]
    fn test_tick_size_rounding() {
        let inst = Instrument::new("SPY", 0.01).unwrap();
        assert!((inst.round_price(100.126) - 100.13).abs() < 1e-9);
        assert!((inst.round_price(100.124) - 100.12).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_tick_size() {
        assert!(Instrument::new("X", 0.0).is_err());
        assert!(Instrument::new("X", -0.5).is_err());
        assert!(Instrument::new("X", f64::NAN).is_err());
    }
}
