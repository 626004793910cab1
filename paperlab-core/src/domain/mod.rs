//! Domain types: candles, instrument metadata, trend labels.

pub mod candle;
pub mod instrument;
pub mod trend;

pub use candle::Candle;
pub use instrument::{Instrument, InstrumentError};
pub use trend::{CloudTrend, Direction, Strength, Trend, TrendDot};
