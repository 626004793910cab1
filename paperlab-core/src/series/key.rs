//! Typed names for every series the engine exposes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Scalar output series, addressed by name rather than by position.
///
/// Label series (trends, edges, exits) read as numeric codes; see the `code()`
/// methods on the label types. Unset slots read as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKey {
    LaguerreL0,
    LaguerreL1,
    LaguerreL2,
    LaguerreL3,
    GaussianOpen,
    GaussianHigh,
    GaussianLow,
    GaussianClose,
    FractalGamma,
    Oscillator,
    ThresholdEdge,
    FastMa,
    SlowMa,
    CloudTrend,
    CloudDirection,
    CloudCrossover,
    HaOpen,
    HaHigh,
    HaLow,
    HaClose,
    CandleTrend,
    TrendDot,
    Adx,
    AdxStrength,
    PriceCrossMa,
    PriceCross,
    PriceCrossMarker,
    EntrySignal,
    ReenterLong,
    ReenterShort,
    Exit,
    ExitReason,
}

impl SeriesKey {
    pub const ALL: [SeriesKey; 32] = [
        SeriesKey::LaguerreL0,
        SeriesKey::LaguerreL1,
        SeriesKey::LaguerreL2,
        SeriesKey::LaguerreL3,
        SeriesKey::GaussianOpen,
        SeriesKey::GaussianHigh,
        SeriesKey::GaussianLow,
        SeriesKey::GaussianClose,
        SeriesKey::FractalGamma,
        SeriesKey::Oscillator,
        SeriesKey::ThresholdEdge,
        SeriesKey::FastMa,
        SeriesKey::SlowMa,
        SeriesKey::CloudTrend,
        SeriesKey::CloudDirection,
        SeriesKey::CloudCrossover,
        SeriesKey::HaOpen,
        SeriesKey::HaHigh,
        SeriesKey::HaLow,
        SeriesKey::HaClose,
        SeriesKey::CandleTrend,
        SeriesKey::TrendDot,
        SeriesKey::Adx,
        SeriesKey::AdxStrength,
        SeriesKey::PriceCrossMa,
        SeriesKey::PriceCross,
        SeriesKey::PriceCrossMarker,
        SeriesKey::EntrySignal,
        SeriesKey::ReenterLong,
        SeriesKey::ReenterShort,
        SeriesKey::Exit,
        SeriesKey::ExitReason,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SeriesKey::LaguerreL0 => "laguerre_l0",
            SeriesKey::LaguerreL1 => "laguerre_l1",
            SeriesKey::LaguerreL2 => "laguerre_l2",
            SeriesKey::LaguerreL3 => "laguerre_l3",
            SeriesKey::GaussianOpen => "gaussian_open",
            SeriesKey::GaussianHigh => "gaussian_high",
            SeriesKey::GaussianLow => "gaussian_low",
            SeriesKey::GaussianClose => "gaussian_close",
            SeriesKey::FractalGamma => "fractal_gamma",
            SeriesKey::Oscillator => "oscillator",
            SeriesKey::ThresholdEdge => "threshold_edge",
            SeriesKey::FastMa => "fast_ma",
            SeriesKey::SlowMa => "slow_ma",
            SeriesKey::CloudTrend => "cloud_trend",
            SeriesKey::CloudDirection => "cloud_direction",
            SeriesKey::CloudCrossover => "cloud_crossover",
            SeriesKey::HaOpen => "ha_open",
            SeriesKey::HaHigh => "ha_high",
            SeriesKey::HaLow => "ha_low",
            SeriesKey::HaClose => "ha_close",
            SeriesKey::CandleTrend => "candle_trend",
            SeriesKey::TrendDot => "trend_dot",
            SeriesKey::Adx => "adx",
            SeriesKey::AdxStrength => "adx_strength",
            SeriesKey::PriceCrossMa => "price_cross_ma",
            SeriesKey::PriceCross => "price_cross",
            SeriesKey::PriceCrossMarker => "price_cross_marker",
            SeriesKey::EntrySignal => "entry_signal",
            SeriesKey::ReenterLong => "reenter_long",
            SeriesKey::ReenterShort => "reenter_short",
            SeriesKey::Exit => "exit",
            SeriesKey::ExitReason => "exit_reason",
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown series key: {0}")]
pub struct UnknownSeriesKey(pub String);

impl FromStr for SeriesKey {
    type Err = UnknownSeriesKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeriesKey::ALL
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| UnknownSeriesKey(s.to_string()))
    }
}

/// Range-band outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandKey {
    Overbought,
    Oversold,
    BullishCloud,
    BearishCloud,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for key in SeriesKey::ALL {
            assert_eq!(key.name().parse::<SeriesKey>(), Ok(key));
        }
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = SeriesKey::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SeriesKey::ALL.len());
    }

    #[test]
    fn serde_name_matches_display() {
        let json = serde_json::to_string(&SeriesKey::CloudCrossover).unwrap();
        assert_eq!(json, "\"cloud_crossover\"");
        assert_eq!(SeriesKey::CloudCrossover.to_string(), "cloud_crossover");
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "lrsi".parse::<SeriesKey>().unwrap_err();
        assert_eq!(err.to_string(), "unknown series key: lrsi");
    }
}
