//! Trend labels shared by the classifiers and the signal orchestrator.
//!
//! Every label has a numeric code so it can be read through the engine's
//! `f64` series accessor. Unset slots read as 0.

use serde::{Deserialize, Serialize};

/// Two-state candle direction. `close >= open` is bullish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Bullish,
    Bearish,
}

impl Trend {
    pub fn from_open_close(open: f64, close: f64) -> Self {
        if close >= open {
            Trend::Bullish
        } else {
            Trend::Bearish
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Trend::Bullish => Trend::Bearish,
            Trend::Bearish => Trend::Bullish,
        }
    }

    /// `1.0` bullish, `-1.0` bearish.
    pub fn code(self) -> f64 {
        match self {
            Trend::Bullish => 1.0,
            Trend::Bearish => -1.0,
        }
    }
}

/// Trade side a signal points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// `1.0` long, `-1.0` short.
    pub fn code(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }

    /// The trend a position on this side rides.
    pub fn trend(self) -> Trend {
        match self {
            Direction::Long => Trend::Bullish,
            Direction::Short => Trend::Bearish,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }
}

/// Three-state Heiken-Ashi trend dot.
///
/// Two consecutive candles in the same direction confirm the trend; a flip
/// between them is `Changing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendDot {
    Bullish,
    Changing,
    Bearish,
}

impl TrendDot {
    pub fn from_pair(previous: Trend, current: Trend) -> Self {
        match (previous, current) {
            (Trend::Bullish, Trend::Bullish) => TrendDot::Bullish,
            (Trend::Bearish, Trend::Bearish) => TrendDot::Bearish,
            _ => TrendDot::Changing,
        }
    }

    /// `1.0` bullish, `0.5` changing, `-1.0` bearish.
    pub fn code(self) -> f64 {
        match self {
            TrendDot::Bullish => 1.0,
            TrendDot::Changing => 0.5,
            TrendDot::Bearish => -1.0,
        }
    }
}

/// Fast-vs-slow moving average relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloudTrend {
    Bullish,
    Neutral,
    Bearish,
}

impl CloudTrend {
    pub fn from_averages(fast: f64, slow: f64) -> Self {
        if fast > slow {
            CloudTrend::Bullish
        } else if fast < slow {
            CloudTrend::Bearish
        } else {
            CloudTrend::Neutral
        }
    }

    /// The strict direction, `None` when neutral.
    pub fn direction(self) -> Option<Trend> {
        match self {
            CloudTrend::Bullish => Some(Trend::Bullish),
            CloudTrend::Bearish => Some(Trend::Bearish),
            CloudTrend::Neutral => None,
        }
    }

    /// `1.0` bullish, `0.5` neutral, `-1.0` bearish.
    pub fn code(self) -> f64 {
        match self {
            CloudTrend::Bullish => 1.0,
            CloudTrend::Neutral => 0.5,
            CloudTrend::Bearish => -1.0,
        }
    }
}

/// ADX trend strength bucket, ordered weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

impl Strength {
    /// Bucket an ADX value. A value equal to a threshold lands in the stronger bucket.
    pub fn classify(adx: f64, medium_threshold: f64, strong_threshold: f64) -> Self {
        if adx >= strong_threshold {
            Strength::Strong
        } else if adx >= medium_threshold {
            Strength::Medium
        } else {
            Strength::Weak
        }
    }

    /// `1.0` weak, `2.0` medium, `3.0` strong.
    pub fn code(self) -> f64 {
        match self {
            Strength::Weak => 1.0,
            Strength::Medium => 2.0,
            Strength::Strong => 3.0,
        }
    }
}
