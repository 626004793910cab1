//! Configuration errors rejected by `Engine::new` and `Engine::configure`.

use crate::domain::InstrumentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be >= 1")]
    ZeroPeriod { field: &'static str },

    #[error("oscillator.gaussian_length must be >= 2, got {0}")]
    GaussianLengthTooShort(usize),

    #[error("oscillator.alpha must be in (0, 1], got {0}")]
    InvalidAlpha(f64),

    #[error("{field} must be within [0, 100], got {value}")]
    LevelOutOfRange { field: &'static str, value: f64 },

    #[error("oversold level {oversold} must be below overbought level {overbought}")]
    LevelsInverted { oversold: f64, overbought: f64 },

    #[error("{field} must be finite and >= 0, got {value}")]
    InvalidThreshold { field: &'static str, value: f64 },

    #[error("ADX medium threshold {medium} must be below strong threshold {strong}")]
    AdxThresholdsInverted { medium: f64, strong: f64 },

    #[error("MA cloud fast period {fast} must be below slow period {slow}")]
    MaPeriodsInverted { fast: usize, slow: usize },

    #[error("invalid instrument: {0}")]
    Instrument(#[from] InstrumentError),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}
