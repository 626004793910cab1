//! Composite trading signals.
//!
//! The orchestrator fuses the oscillator edges, the MA cloud and the
//! Heiken-Ashi trend into Enter / Re-enter / Exit signals. Every fired signal
//! becomes a [`SignalEvent`] tagged with its [`SignalCategory`]; at most one
//! event per category per bar is ever emitted.

pub mod alert;
pub mod orchestrator;

pub use alert::{Alert, AlertLedger, AlertSink, AlertStyle, Color, MemorySink};
pub use orchestrator::{BarSignals, ExitSignal, Marker, SignalInputs, SignalOrchestrator};

use crate::domain::Direction;
use crate::indicators::MaType;
use crate::oscillator::ThresholdEdge;
use serde::{Deserialize, Serialize};

/// Why an exit fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Bearish HA candle without an upper wick.
    FlatTop,
    /// Bullish HA candle without a lower wick.
    FlatBottom,
    /// The opposite trend has just been confirmed by two HA candles.
    OppositeTrendDot,
}

impl ExitReason {
    /// `1` flat top, `2` flat bottom, `3` opposite trend dot.
    pub fn code(self) -> f64 {
        match self {
            ExitReason::FlatTop => 1.0,
            ExitReason::FlatBottom => 2.0,
            ExitReason::OppositeTrendDot => 3.0,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ExitReason::FlatTop => "Bearish HA candle with flat top",
            ExitReason::FlatBottom => "Bullish HA candle with flat bottom",
            ExitReason::OppositeTrendDot => "Opposite trend dot",
        }
    }
}

/// Kind of signal an event carries; also the dedup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    EnterLong,
    EnterShort,
    ReenterLong,
    ReenterShort,
    ExitLong(ExitReason),
    ExitShort(ExitReason),
    Threshold(ThresholdEdge),
    PriceCross(Direction),
}

/// Values interpolated into event messages.
#[derive(Debug, Clone, Copy)]
pub struct MessageContext {
    pub oscillator: f64,
    pub price_cross_period: usize,
    pub price_cross_ma: MaType,
}

impl SignalCategory {
    pub fn is_exit(self) -> bool {
        matches!(self, SignalCategory::ExitLong(_) | SignalCategory::ExitShort(_))
    }

    pub fn message(self, ctx: &MessageContext) -> String {
        let osc = format_level(ctx.oscillator);
        match self {
            SignalCategory::EnterLong => {
                format!("BUY SIGNAL: Laguerre RSI leaving oversold region {osc}")
            }
            SignalCategory::EnterShort => {
                format!("SELL SIGNAL: Laguerre RSI leaving overbought region {osc}")
            }
            SignalCategory::ReenterLong => "Re-enter LONG: Trend returning to bullish".to_string(),
            SignalCategory::ReenterShort => {
                "Re-enter SHORT: Trend returning to bearish".to_string()
            }
            SignalCategory::ExitLong(reason) => format!("Exit LONG: {}", reason.describe()),
            SignalCategory::ExitShort(reason) => format!("Exit SHORT: {}", reason.describe()),
            SignalCategory::Threshold(edge) => format!("Laguerre RSI {} {osc}", edge.describe()),
            SignalCategory::PriceCross(Direction::Long) => format!(
                "BUY SIGNAL: Price crossed and closed above the {} {}",
                ctx.price_cross_period, ctx.price_cross_ma
            ),
            SignalCategory::PriceCross(Direction::Short) => format!(
                "SELL SIGNAL: Price crossed and closed below the {} {}",
                ctx.price_cross_period, ctx.price_cross_ma
            ),
        }
    }
}

/// Up to five decimals, trailing zeros dropped.
pub fn format_level(value: f64) -> String {
    let s = format!("{value:.5}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// One fired signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub category: SignalCategory,
    pub bar_index: usize,
    pub message: String,
    /// Marker price, for categories drawn at a price level.
    pub price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> MessageContext {
        MessageContext {
            oscillator: 21.456789,
            price_cross_period: 9,
            price_cross_ma: MaType::Sma,
        }
    }

    #[test]
    fn level_formatting_trims_zeros() {
        assert_eq!(format_level(21.456789), "21.45679");
        assert_eq!(format_level(80.0), "80");
        assert_eq!(format_level(12.5), "12.5");
        assert_eq!(format_level(0.0), "0");
    }

    #[test]
    fn messages_by_category() {
        let c = ctx();
        assert_eq!(
            SignalCategory::EnterLong.message(&c),
            "BUY SIGNAL: Laguerre RSI leaving oversold region 21.45679"
        );
        assert_eq!(
            SignalCategory::ExitLong(ExitReason::FlatTop).message(&c),
            "Exit LONG: Bearish HA candle with flat top"
        );
        assert_eq!(
            SignalCategory::ExitShort(ExitReason::OppositeTrendDot).message(&c),
            "Exit SHORT: Opposite trend dot"
        );
        assert_eq!(
            SignalCategory::Threshold(ThresholdEdge::EnterOverbought).message(&c),
            "Laguerre RSI entering overbought region 21.45679"
        );
        assert_eq!(
            SignalCategory::PriceCross(Direction::Long).message(&c),
            "BUY SIGNAL: Price crossed and closed above the 9 SMA"
        );
    }

    #[test]
    fn category_serializes_with_payload() {
        let json = serde_json::to_string(&SignalCategory::ExitLong(ExitReason::FlatTop)).unwrap();
        assert_eq!(json, r#"{"exit_long":"flat_top"}"#);
        let json = serde_json::to_string(&SignalCategory::ReenterShort).unwrap();
        assert_eq!(json, r#""reenter_short""#);
    }
}
