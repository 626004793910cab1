//! PaperLab Core: incremental indicator engine and composite signals.
//!
//! This crate contains:
//! - Index-addressed bar series and typed series keys
//! - Recursive filters (Laguerre cascade, Gaussian 4-pole, fractal energy)
//! - Laguerre RSI oscillator with overbought/oversold edge detection
//! - Trend classifiers (MA cloud, Heiken-Ashi candle trend, ADX strength, price cross)
//! - Signal orchestrator producing deduplicated Enter / Re-enter / Exit events
//! - The per-instrument [`Engine`] facade tying them together

pub mod classifiers;
pub mod domain;
pub mod engine;
pub mod filters;
pub mod indicators;
pub mod oscillator;
pub mod series;
pub mod signals;

pub use domain::{Candle, Instrument};
pub use engine::{ConfigError, Engine, EngineConfig};
pub use series::{Band, BandKey, SeriesKey};
pub use signals::{Alert, AlertSink, SignalCategory, SignalEvent};
