//! Trend classifiers.
//!
//! Each classifier owns its indicators and label series and is advanced once
//! per bar by the engine. Labels read as `None` where not yet classified.

pub mod adx_strength;
pub mod candle_trend;
pub mod ma_cloud;
pub mod price_cross;

pub use adx_strength::AdxStrength;
pub use candle_trend::CandleTrend;
pub use ma_cloud::MaCloud;
pub use price_cross::PriceCross;
