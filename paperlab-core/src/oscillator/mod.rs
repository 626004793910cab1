//! Laguerre RSI oscillator and its overbought/oversold edge detector.

pub mod laguerre_rsi;
pub mod threshold;

pub use laguerre_rsi::{rsi_from_stages, LaguerreRsi, OscillatorMode};
pub use threshold::{ThresholdDetector, ThresholdEdge, ThresholdLevels};
