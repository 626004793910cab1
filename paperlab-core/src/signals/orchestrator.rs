//! Composite signal orchestrator.
//!
//! Evaluated from bar 2 (three bars of Heiken-Ashi history) once the
//! instrument is known:
//!
//! - Entry: the oscillator leaving oversold enters long, leaving overbought
//!   enters short.
//! - Re-entry: with the MA cloud pointing the same way, the HA trend has just
//!   returned to that direction (two candles after a flip).
//! - Exit, first enabled match wins:
//!   1. long, bearish HA candle with `high == open` (flat top)
//!   2. long, bearish trend has just returned
//!   3. short, bullish HA candle with `low == open` (flat bottom)
//!   4. short, bullish trend has just returned
//!
//! "Long" and "short" here mean fast MA above / below the slow MA.

use crate::classifiers::{CandleTrend, MaCloud};
use crate::domain::{Candle, Direction, Instrument, Trend};
use crate::engine::config::SignalsConfig;
use crate::indicators::HeikenAshi;
use crate::oscillator::{ThresholdDetector, ThresholdEdge};
use crate::series::Series;
use serde::Serialize;

use super::{ExitReason, SignalCategory};

/// First bar the orchestrator evaluates.
pub const ORCHESTRATOR_WARMUP: usize = 2;

/// A signal drawn at a price level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub direction: Direction,
    pub price: f64,
}

/// Exit of a position on `direction`'s side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExitSignal {
    pub direction: Direction,
    pub reason: ExitReason,
    pub price: f64,
}

/// Everything the orchestrator fired on one bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BarSignals {
    pub entry: Option<Direction>,
    pub reentry: Option<Marker>,
    pub exit: Option<ExitSignal>,
}

impl BarSignals {
    pub fn is_empty(&self) -> bool {
        self.entry.is_none() && self.reentry.is_none() && self.exit.is_none()
    }

    /// Fired categories with their marker price, in emission order.
    pub fn categories(&self) -> Vec<(SignalCategory, Option<f64>)> {
        let mut out = Vec::new();
        match self.entry {
            Some(Direction::Long) => out.push((SignalCategory::EnterLong, None)),
            Some(Direction::Short) => out.push((SignalCategory::EnterShort, None)),
            None => {}
        }
        if let Some(marker) = self.reentry {
            let category = match marker.direction {
                Direction::Long => SignalCategory::ReenterLong,
                Direction::Short => SignalCategory::ReenterShort,
            };
            out.push((category, Some(marker.price)));
        }
        if let Some(exit) = self.exit {
            let category = match exit.direction {
                Direction::Long => SignalCategory::ExitLong(exit.reason),
                Direction::Short => SignalCategory::ExitShort(exit.reason),
            };
            out.push((category, Some(exit.price)));
        }
        out
    }
}

/// Read-only view of the components the orchestrator fuses.
#[derive(Clone, Copy)]
pub struct SignalInputs<'a> {
    pub cloud: &'a MaCloud,
    pub candle_trend: &'a CandleTrend,
    pub heiken_ashi: &'a HeikenAshi,
    pub threshold: &'a ThresholdDetector,
}

fn is_flat_top(ha: &Candle) -> bool {
    ha.close < ha.open && ha.high == ha.open
}

fn is_flat_bottom(ha: &Candle) -> bool {
    ha.close > ha.open && ha.low == ha.open
}

#[derive(Debug, Clone)]
pub struct SignalOrchestrator {
    config: SignalsConfig,
    signals: Series<BarSignals>,
}

impl SignalOrchestrator {
    pub fn new(config: &SignalsConfig) -> Self {
        Self {
            config: config.clone(),
            signals: Series::new(),
        }
    }

    pub fn update(
        &mut self,
        index: usize,
        inputs: &SignalInputs<'_>,
        instrument: &Instrument,
    ) -> BarSignals {
        if index < ORCHESTRATOR_WARMUP {
            return BarSignals::default();
        }
        let signals = BarSignals {
            entry: self.entry(index, inputs),
            reentry: self.reentry(index, inputs, instrument),
            exit: self.exit(index, inputs, instrument),
        };
        self.signals.set(index, signals);
        signals
    }

    fn entry(&self, index: usize, inputs: &SignalInputs<'_>) -> Option<Direction> {
        match inputs.threshold.edge(index)? {
            ThresholdEdge::ExitOversold if self.config.enter_long.enabled => Some(Direction::Long),
            ThresholdEdge::ExitOverbought if self.config.enter_short.enabled => {
                Some(Direction::Short)
            }
            _ => None,
        }
    }

    fn reentry(
        &self,
        index: usize,
        inputs: &SignalInputs<'_>,
        instrument: &Instrument,
    ) -> Option<Marker> {
        let fast = inputs.cloud.fast(index);
        let slow = inputs.cloud.slow(index);
        let ha = inputs.heiken_ashi.candle(index);
        let offset = instrument.ticks(self.config.reentry_offset_ticks);

        if self.config.reenter_long.enabled
            && fast > slow
            && inputs.candle_trend.returning_to(index, Trend::Bullish)
        {
            return Some(Marker {
                direction: Direction::Long,
                price: ha.low - offset,
            });
        }
        if self.config.reenter_short.enabled
            && fast < slow
            && inputs.candle_trend.returning_to(index, Trend::Bearish)
        {
            return Some(Marker {
                direction: Direction::Short,
                price: ha.high + offset,
            });
        }
        None
    }

    fn exit(
        &self,
        index: usize,
        inputs: &SignalInputs<'_>,
        instrument: &Instrument,
    ) -> Option<ExitSignal> {
        let fast = inputs.cloud.fast(index);
        let slow = inputs.cloud.slow(index);
        let ha = inputs.heiken_ashi.candle(index);
        let trend = inputs.candle_trend;
        let offset = instrument.ticks(self.config.exit_offset_ticks);
        let cfg = &self.config;

        let long_exit = |reason| ExitSignal {
            direction: Direction::Long,
            reason,
            price: ha.high + offset,
        };
        let short_exit = |reason| ExitSignal {
            direction: Direction::Short,
            reason,
            price: ha.low - offset,
        };

        if fast > slow {
            if cfg.exit_long_flat_top.enabled && is_flat_top(&ha) {
                return Some(long_exit(ExitReason::FlatTop));
            }
            if cfg.exit_long_trend_dot.enabled && trend.returning_to(index, Trend::Bearish) {
                return Some(long_exit(ExitReason::OppositeTrendDot));
            }
        } else if fast < slow {
            if cfg.exit_short_flat_bottom.enabled && is_flat_bottom(&ha) {
                return Some(short_exit(ExitReason::FlatBottom));
            }
            if cfg.exit_short_trend_dot.enabled && trend.returning_to(index, Trend::Bullish) {
                return Some(short_exit(ExitReason::OppositeTrendDot));
            }
        }
        None
    }

    pub fn signals(&self, index: usize) -> BarSignals {
        self.signals.get(index)
    }

    pub fn truncate(&mut self, len: usize) {
        self.signals.truncate(len);
    }

    pub fn clear(&mut self) {
        self.signals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::MaCloudConfig;
    use crate::indicators::MaType;
    use crate::oscillator::ThresholdLevels;

    struct Harness {
        candles: Series<Candle>,
        cloud: MaCloud,
        ha: HeikenAshi,
        trend: CandleTrend,
        threshold: ThresholdDetector,
        orchestrator: SignalOrchestrator,
        instrument: Instrument,
    }

    impl Harness {
        fn new(config: SignalsConfig) -> Self {
            Self {
                candles: Series::new(),
                cloud: MaCloud::new(&MaCloudConfig {
                    ma_type: MaType::Sma,
                    fast_period: 1,
                    slow_period: 8,
                }),
                ha: HeikenAshi::new(),
                trend: CandleTrend::new(),
                threshold: ThresholdDetector::new(ThresholdLevels::default()),
                orchestrator: SignalOrchestrator::new(&config),
                instrument: Instrument::new("TEST", 0.25).unwrap(),
            }
        }

        fn push(&mut self, candle: Candle, osc: Option<(f64, f64)>) -> BarSignals {
            let i = self.candles.len();
            self.candles.set(i, candle);
            let ha = self.ha.update(i, &candle);
            self.trend.update(i, &ha);
            self.cloud.update(i, &self.candles);
            match osc {
                Some((prev, curr)) => self.threshold.update(i, Some(prev), Some(curr)),
                None => self.threshold.update(i, None, None),
            };
            let inputs = SignalInputs {
                cloud: &self.cloud,
                candle_trend: &self.trend,
                heiken_ashi: &self.ha,
                threshold: &self.threshold,
            };
            self.orchestrator.update(i, &inputs, &self.instrument)
        }
    }

    fn up(c: f64) -> Candle {
        Candle::new(c - 1.0, c + 0.5, c - 1.5, c)
    }

    /// Steady climb, a two-bar pullback, then recovery. Fast (close) stays
    /// above slow (SMA 8) throughout. HA trend: bullish 0..=5, bearish 6..=7
    /// (bar 7 without an upper wick), bullish 8..=9.
    fn pullback() -> Vec<Candle> {
        let mut candles: Vec<Candle> = [10.0, 12.0, 14.0, 16.0, 18.0, 20.0]
            .into_iter()
            .map(up)
            .collect();
        candles.extend([
            Candle::new(19.0, 19.0, 15.0, 15.5),
            Candle::new(15.5, 17.0, 15.5, 16.8),
            Candle::new(16.8, 18.5, 16.8, 18.2),
            Candle::new(18.2, 19.5, 18.0, 19.2),
        ]);
        candles
    }

    fn replay(h: &mut Harness, candles: &[Candle]) -> Vec<BarSignals> {
        candles.iter().map(|c| h.push(*c, None)).collect()
    }

    #[test]
    fn nothing_before_bar_two() {
        let mut h = Harness::new(SignalsConfig::default());
        assert!(h.push(up(10.0), Some((10.0, 30.0))).is_empty());
        assert!(h.push(up(11.0), Some((10.0, 30.0))).is_empty());
        assert_eq!(h.orchestrator.signals(1), BarSignals::default());
    }

    #[test]
    fn entry_follows_oversold_and_overbought_exits() {
        let mut h = Harness::new(SignalsConfig::default());
        h.push(up(10.0), None);
        h.push(up(11.0), None);
        assert_eq!(h.push(up(12.0), Some((15.0, 25.0))).entry, Some(Direction::Long));
        assert_eq!(h.push(up(13.0), Some((85.0, 75.0))).entry, Some(Direction::Short));
        assert_eq!(h.push(up(14.0), Some((50.0, 85.0))).entry, None);
    }

    #[test]
    fn disabled_category_produces_nothing() {
        let mut config = SignalsConfig::default();
        config.enter_long.enabled = false;
        let mut h = Harness::new(config);
        h.push(up(10.0), None);
        h.push(up(11.0), None);
        assert_eq!(h.push(up(12.0), Some((15.0, 25.0))).entry, None);
    }

    #[test]
    fn flat_top_wins_over_trend_dot_exit() {
        let mut h = Harness::new(SignalsConfig::default());
        let out = replay(&mut h, &pullback());

        let ha = h.ha.candle(7);
        assert!(h.cloud.fast(7) > h.cloud.slow(7));
        assert_eq!(ha.high, ha.open);
        assert!(h.trend.returning_to(7, Trend::Bearish));
        assert_eq!(
            out[7].exit,
            Some(ExitSignal {
                direction: Direction::Long,
                reason: ExitReason::FlatTop,
                price: ha.high + 1.75,
            })
        );
        // The first bearish bar has a wick and no confirmed trend yet.
        assert_eq!(out[6].exit, None);
    }

    #[test]
    fn trend_dot_exit_when_flat_top_disabled() {
        let mut config = SignalsConfig::default();
        config.exit_long_flat_top.enabled = false;
        let mut h = Harness::new(config);
        let out = replay(&mut h, &pullback());
        let exit = out[7].exit.unwrap();
        assert_eq!(exit.reason, ExitReason::OppositeTrendDot);
        assert_eq!(exit.direction, Direction::Long);
    }

    #[test]
    fn reentry_long_after_bullish_return_in_uptrend() {
        let mut h = Harness::new(SignalsConfig::default());
        let out = replay(&mut h, &pullback());
        let ha = h.ha.candle(9);
        assert_eq!(
            out[9].reentry,
            Some(Marker {
                direction: Direction::Long,
                price: ha.low - 1.0,
            })
        );
        assert!(out[8].reentry.is_none());
        assert!(out.iter().all(|s| s.entry.is_none()));
    }

    #[test]
    fn categories_carry_marker_prices() {
        let signals = BarSignals {
            entry: Some(Direction::Long),
            reentry: None,
            exit: Some(ExitSignal {
                direction: Direction::Short,
                reason: ExitReason::FlatBottom,
                price: 9.5,
            }),
        };
        assert_eq!(
            signals.categories(),
            vec![
                (SignalCategory::EnterLong, None),
                (SignalCategory::ExitShort(ExitReason::FlatBottom), Some(9.5)),
            ]
        );
    }
}
