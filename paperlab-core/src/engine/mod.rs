//! Per-instrument engine: owns every component and drives them bar by bar.
//!
//! Each `on_bar` call runs, in order:
//! 1. Heiken-Ashi candle
//! 2. Oscillator (Gaussian bank, fractal energy, Laguerre cascade)
//! 3. Threshold edge detector
//! 4. MA cloud, candle trend, ADX strength, price cross
//! 5. Signal orchestrator (only once an instrument is known)
//!
//! Only the last bar may be revised. A revision truncates every component to
//! the bar being rewritten before recomputing it, so reads never see stale
//! values. Changing the configuration or the instrument replays the stored
//! history silently.
//!
//! A void candle (non-finite prices) still takes its bar index. The previous
//! candle is carried forward into that slot so the recursive filters stay
//! continuous, and the bar is marked as a gap: it writes no signal markers and
//! emits no events.

pub mod config;
pub mod error;

pub use config::{
    AdxConfig, AlertTiming, AlertsConfig, CategoryConfig, EngineConfig, MaCloudConfig,
    OscillatorConfig, PriceCrossConfig, SignalsConfig, ThresholdAlerts, ThresholdConfig,
};
pub use error::ConfigError;

use crate::classifiers::{AdxStrength, CandleTrend, MaCloud, PriceCross};
use crate::domain::{Candle, CloudTrend, Direction, Instrument, Strength, TrendDot};
use crate::filters::GaussianFilter;
use crate::indicators::HeikenAshi;
use crate::oscillator::{LaguerreRsi, ThresholdDetector, ThresholdEdge};
use crate::series::{Band, BandKey, Series, SeriesKey};
use crate::signals::{
    Alert, AlertLedger, AlertSink, BarSignals, MessageContext, SignalCategory, SignalEvent,
    SignalInputs, SignalOrchestrator,
};
use tracing::{debug, trace, warn};

/// Every stateful component, rebuilt as a unit on reconfiguration.
#[derive(Debug, Clone)]
struct Components {
    heiken_ashi: HeikenAshi,
    oscillator: LaguerreRsi,
    threshold: ThresholdDetector,
    cloud: MaCloud,
    candle_trend: CandleTrend,
    adx: AdxStrength,
    price_cross: PriceCross,
    price_cross_marker: Series<f64>,
    orchestrator: SignalOrchestrator,
}

impl Components {
    fn new(config: &EngineConfig) -> Self {
        Self {
            heiken_ashi: HeikenAshi::new(),
            oscillator: LaguerreRsi::new(&config.oscillator),
            threshold: ThresholdDetector::new(config.thresholds.levels()),
            cloud: MaCloud::new(&config.ma_cloud),
            candle_trend: CandleTrend::new(),
            adx: AdxStrength::new(&config.adx),
            price_cross: PriceCross::new(&config.price_cross),
            price_cross_marker: Series::new(),
            orchestrator: SignalOrchestrator::new(&config.signals),
        }
    }

    fn truncate(&mut self, len: usize) {
        self.heiken_ashi.truncate(len);
        self.oscillator.truncate(len);
        self.threshold.truncate(len);
        self.cloud.truncate(len);
        self.candle_trend.truncate(len);
        self.adx.truncate(len);
        self.price_cross.truncate(len);
        self.price_cross_marker.truncate(len);
        self.orchestrator.truncate(len);
    }

    fn clear(&mut self) {
        self.truncate(0);
    }
}

pub struct Engine {
    config: EngineConfig,
    instrument: Option<Instrument>,
    candles: Series<Candle>,
    gaps: Series<bool>,
    components: Components,
    ledger: AlertLedger,
    sink: Option<Box<dyn AlertSink + Send>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("instrument", &self.instrument)
            .field("bars", &self.candles.len())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let components = Components::new(&config);
        Ok(Self {
            config,
            instrument: None,
            candles: Series::new(),
            gaps: Series::new(),
            components,
            ledger: AlertLedger::new(),
            sink: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn instrument(&self) -> Option<&Instrument> {
        self.instrument.as_ref()
    }

    /// Number of bars seen so far.
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Stored candle at `index`; for a gap bar, the candle carried into it.
    pub fn candle(&self, index: usize) -> Candle {
        self.candles.get(index)
    }

    /// True when bar `index` arrived as a void candle.
    pub fn is_gap(&self, index: usize) -> bool {
        self.gaps.get(index)
    }

    /// Validate and apply a new configuration, then replay stored history.
    ///
    /// On error the engine keeps its previous configuration and state.
    pub fn configure(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        debug!(bars = self.candles.len(), "reconfiguring engine");
        self.components = Components::new(&config);
        self.config = config;
        self.recalculate();
        Ok(())
    }

    /// Replace the instrument metadata. `None` leaves the engine not ready.
    pub fn set_instrument(&mut self, instrument: Option<Instrument>) -> Result<(), ConfigError> {
        if let Some(inst) = &instrument {
            // Fields are public, so re-check what `Instrument::new` enforces.
            Instrument::new(inst.symbol.clone(), inst.tick_size)?;
        }
        if self.instrument == instrument {
            return Ok(());
        }
        debug!(
            symbol = instrument.as_ref().map(|i| i.symbol.as_str()),
            "instrument changed"
        );
        self.instrument = instrument;
        self.recalculate();
        Ok(())
    }

    pub fn set_alert_sink(&mut self, sink: Box<dyn AlertSink + Send>) {
        self.sink = Some(sink);
    }

    /// Clear all state, stored candles included. Configuration, instrument and
    /// sink are kept.
    pub fn reset(&mut self) {
        self.candles.clear();
        self.gaps.clear();
        self.components.clear();
        self.ledger.clear();
    }

    /// Reset, then replay `candles` silently from bar 0.
    pub fn load_history(&mut self, candles: &[Candle]) {
        self.reset();
        for (index, candle) in candles.iter().enumerate() {
            self.store(index, *candle);
            self.compute(index);
        }
        let gaps = self.gaps.as_slice().iter().filter(|g| **g).count();
        if gaps > 0 {
            warn!(gaps, "history contains void candles");
        }
        debug!(bars = self.candles.len(), "history loaded");
    }

    /// Process bar `index`, either a new bar (`index == len`) or a revision of
    /// the last one (`index == len - 1`). Returns the events emitted by this
    /// call according to the configured [`AlertTiming`].
    pub fn on_bar(&mut self, index: usize, candle: Candle) -> Vec<SignalEvent> {
        let len = self.candles.len();
        let is_new = index == len;
        if index > len || index + 1 < len {
            warn!(index, bars = len, "ignoring out-of-sequence bar");
            return Vec::new();
        }
        if !is_new {
            self.components.truncate(index);
        }
        if candle.is_void() {
            warn!(index, "void candle, carrying the previous bar forward");
        }
        self.store(index, candle);
        self.compute(index);

        match self.config.alerts.timing {
            AlertTiming::BarClose if is_new && index > 0 => self.emit(index - 1),
            AlertTiming::BarClose => Vec::new(),
            AlertTiming::Intrabar => self.emit(index),
        }
    }

    /// Emit any pending events of the last bar, treating it as closed.
    ///
    /// With [`AlertTiming::BarClose`] the final bar of a finite replay is
    /// otherwise never reported.
    pub fn flush(&mut self) -> Vec<SignalEvent> {
        match self.candles.len() {
            0 => Vec::new(),
            len => self.emit(len - 1),
        }
    }

    /// Numeric value of a named series at `index`; 0 when unset.
    pub fn value(&self, key: SeriesKey, index: usize) -> f64 {
        let c = &self.components;
        let osc = &c.oscillator;
        let ha = || c.heiken_ashi.candle(index);
        let gaussian = |f: &GaussianFilter| f.value(index);
        let signals = || c.orchestrator.signals(index);
        match key {
            SeriesKey::LaguerreL0 => osc.stage(0, index),
            SeriesKey::LaguerreL1 => osc.stage(1, index),
            SeriesKey::LaguerreL2 => osc.stage(2, index),
            SeriesKey::LaguerreL3 => osc.stage(3, index),
            SeriesKey::GaussianOpen => gaussian(&osc.gaussian().open),
            SeriesKey::GaussianHigh => gaussian(&osc.gaussian().high),
            SeriesKey::GaussianLow => gaussian(&osc.gaussian().low),
            SeriesKey::GaussianClose => gaussian(&osc.gaussian().close),
            SeriesKey::FractalGamma => osc.fractal_gamma(index),
            SeriesKey::Oscillator => osc.value(index),
            SeriesKey::ThresholdEdge => c.threshold.edge(index).map_or(0.0, ThresholdEdge::code),
            SeriesKey::FastMa => c.cloud.fast(index),
            SeriesKey::SlowMa => c.cloud.slow(index),
            SeriesKey::CloudTrend => c.cloud.trend(index).map_or(0.0, CloudTrend::code),
            SeriesKey::CloudDirection => c.cloud.direction(index).map_or(0.0, |t| t.code()),
            SeriesKey::CloudCrossover => c.cloud.crossover(index).map_or(0.0, |t| t.code()),
            SeriesKey::HaOpen => ha().open,
            SeriesKey::HaHigh => ha().high,
            SeriesKey::HaLow => ha().low,
            SeriesKey::HaClose => ha().close,
            SeriesKey::CandleTrend => c.candle_trend.trend(index).map_or(0.0, |t| t.code()),
            SeriesKey::TrendDot => c.candle_trend.dot(index).map_or(0.0, TrendDot::code),
            SeriesKey::Adx => c.adx.adx(index),
            SeriesKey::AdxStrength => c.adx.strength(index).map_or(0.0, Strength::code),
            SeriesKey::PriceCrossMa => c.price_cross.ma(index),
            SeriesKey::PriceCross => c.price_cross.cross(index).map_or(0.0, Direction::code),
            SeriesKey::PriceCrossMarker => c.price_cross_marker.get(index),
            SeriesKey::EntrySignal => signals().entry.map_or(0.0, Direction::code),
            SeriesKey::ReenterLong => match signals().reentry {
                Some(m) if m.direction == Direction::Long => m.price,
                _ => 0.0,
            },
            SeriesKey::ReenterShort => match signals().reentry {
                Some(m) if m.direction == Direction::Short => m.price,
                _ => 0.0,
            },
            SeriesKey::Exit => signals().exit.map_or(0.0, |e| e.price),
            SeriesKey::ExitReason => signals().exit.map_or(0.0, |e| e.reason.code()),
        }
    }

    /// Range band at `index`, if the band is drawn on that bar.
    pub fn band(&self, key: BandKey, index: usize) -> Option<Band> {
        let c = &self.components;
        match key {
            BandKey::Overbought | BandKey::Oversold => {
                if index == 0 || index >= self.candles.len() {
                    return None;
                }
                let levels = c.threshold.levels();
                Some(match key {
                    BandKey::Overbought => levels.overbought_band(),
                    _ => levels.oversold_band(),
                })
            }
            BandKey::BullishCloud => c.cloud.bullish_band(index),
            BandKey::BearishCloud => c.cloud.bearish_band(index),
        }
    }

    pub fn trend_dot(&self, index: usize) -> Option<TrendDot> {
        self.components.candle_trend.dot(index)
    }

    pub fn cloud_trend(&self, index: usize) -> Option<CloudTrend> {
        self.components.cloud.trend(index)
    }

    pub fn strength(&self, index: usize) -> Option<Strength> {
        self.components.adx.strength(index)
    }

    pub fn threshold_edge(&self, index: usize) -> Option<ThresholdEdge> {
        self.components.threshold.edge(index)
    }

    pub fn bar_signals(&self, index: usize) -> BarSignals {
        self.components.orchestrator.signals(index)
    }

    fn recalculate(&mut self) {
        self.components.clear();
        self.ledger.clear();
        for index in 0..self.candles.len() {
            self.compute(index);
        }
        debug!(bars = self.candles.len(), "recalculated");
    }

    /// Write the candle of bar `index`, carrying the previous one into a gap.
    fn store(&mut self, index: usize, candle: Candle) {
        let gap = candle.is_void();
        let stored = if gap {
            index
                .checked_sub(1)
                .map_or_else(Candle::default, |prev| self.candles.get(prev))
        } else {
            candle
        };
        self.gaps.set(index, gap);
        self.candles.set(index, stored);
    }

    fn compute(&mut self, index: usize) {
        let candle = self.candles.get(index);
        let c = &mut self.components;

        let ha = c.heiken_ashi.update(index, &candle);
        c.oscillator.update(index, &candle);
        let prev = index.checked_sub(1).and_then(|p| c.oscillator.ready_value(p));
        let curr = c.oscillator.ready_value(index);
        c.threshold.update(index, prev, curr);

        c.cloud.update(index, &self.candles);
        c.candle_trend.update(index, &ha);
        c.adx.update(index, &self.candles);
        let cross = c.price_cross.update(index, &self.candles);

        let Some(instrument) = self.instrument.as_ref() else {
            return;
        };
        if self.gaps.get(index) {
            return;
        }

        if self.config.price_cross.enabled {
            let offset = instrument.ticks(self.config.price_cross.offset_ticks);
            match cross {
                Some(Direction::Long) => c.price_cross_marker.set(index, candle.low - offset),
                Some(Direction::Short) => c.price_cross_marker.set(index, candle.high + offset),
                None => {}
            }
        }

        let inputs = SignalInputs {
            cloud: &c.cloud,
            candle_trend: &c.candle_trend,
            heiken_ashi: &c.heiken_ashi,
            threshold: &c.threshold,
        };
        c.orchestrator.update(index, &inputs, instrument);
    }

    /// Fired categories of bar `index` with their marker prices.
    fn fired(&self, index: usize) -> Vec<(SignalCategory, Option<f64>)> {
        let c = &self.components;
        let mut out = Vec::new();
        if self.gaps.get(index) {
            return out;
        }
        if let Some(edge) = c.threshold.edge(index) {
            out.push((SignalCategory::Threshold(edge), None));
        }
        out.extend(c.orchestrator.signals(index).categories());
        if let Some(direction) = c.price_cross.cross(index) {
            let price = c.price_cross_marker.get(index);
            out.push((SignalCategory::PriceCross(direction), Some(price)));
        }
        out
    }

    fn emit(&mut self, index: usize) -> Vec<SignalEvent> {
        let Some(instrument) = self.instrument.as_ref() else {
            return Vec::new();
        };
        let ctx = MessageContext {
            oscillator: self.components.oscillator.value(index),
            price_cross_period: self.components.price_cross.period(),
            price_cross_ma: self.components.price_cross.ma_type(),
        };

        let mut events = Vec::new();
        for (category, price) in self.fired(index) {
            let settings = self.config.category(category);
            if !settings.enabled || !self.ledger.try_record(category, index) {
                continue;
            }
            let message = category.message(&ctx);
            trace!(index, ?category, %message, "signal fired");
            if settings.alert {
                if let Some(sink) = self.sink.as_mut() {
                    sink.dispatch(&Alert {
                        instrument: instrument.symbol.clone(),
                        bar_index: index,
                        message: message.clone(),
                        background: settings.style.background,
                        foreground: settings.style.foreground,
                    });
                }
            }
            events.push(SignalEvent {
                category,
                bar_index: index,
                message,
                price,
            });
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::MemorySink;

    fn es() -> Instrument {
        Instrument::new("ES", 0.25).unwrap()
    }

    fn rising(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let base = 100.0 + i as f64;
                Candle::new(base, base + 1.5, base - 0.5, base + 1.0)
            })
            .collect()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.ma_cloud.slow_period = 5;
        assert!(matches!(
            Engine::new(config),
            Err(ConfigError::MaPeriodsInverted { fast: 9, slow: 5 })
        ));
    }

    #[test]
    fn configure_error_keeps_previous_state() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.load_history(&rising(30));
        let before = engine.value(SeriesKey::FastMa, 29);

        let mut bad = EngineConfig::default();
        bad.oscillator.alpha = 1.5;
        assert!(engine.configure(bad).is_err());
        assert_eq!(engine.config(), &EngineConfig::default());
        assert_eq!(engine.value(SeriesKey::FastMa, 29), before);
    }

    #[test]
    fn indicators_compute_without_instrument() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        let mut events = Vec::new();
        for (i, candle) in rising(40).into_iter().enumerate() {
            events.extend(engine.on_bar(i, candle));
        }
        assert!(events.is_empty());
        assert!(engine.value(SeriesKey::Oscillator, 39) > 0.0);
        assert!(engine.value(SeriesKey::FastMa, 39) > engine.value(SeriesKey::SlowMa, 39));
        assert_eq!(engine.bar_signals(39), BarSignals::default());
    }

    #[test]
    fn invalid_instrument_is_rejected() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        let bad = Instrument {
            symbol: "X".into(),
            tick_size: 0.0,
        };
        assert!(matches!(
            engine.set_instrument(Some(bad)),
            Err(ConfigError::Instrument(_))
        ));
        assert!(engine.instrument().is_none());
    }

    #[test]
    fn out_of_sequence_bars_are_ignored() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.set_instrument(Some(es())).unwrap();
        let bars = rising(5);
        for (i, candle) in bars.iter().enumerate() {
            engine.on_bar(i, *candle);
        }
        // gap
        assert!(engine.on_bar(7, bars[0]).is_empty());
        // revision of a closed bar
        assert!(engine.on_bar(2, Candle::flat(1.0)).is_empty());
        assert_eq!(engine.len(), 5);
        assert_eq!(engine.candle(2), bars[2]);
    }

    #[test]
    fn void_candle_takes_its_index() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.set_instrument(Some(es())).unwrap();
        let bars = rising(3);
        engine.on_bar(0, bars[0]);
        assert!(engine.on_bar(1, Candle::new(1.0, f64::NAN, 1.0, 1.0)).is_empty());
        assert_eq!(engine.len(), 2);
        assert!(engine.is_gap(1));
        assert!(!engine.is_gap(0));
        assert_eq!(engine.candle(1), bars[0]);
        engine.on_bar(2, bars[2]);
        assert_eq!(engine.len(), 3);
        assert!(engine.value(SeriesKey::HaClose, 2).is_finite());

        // A leading gap has nothing to carry and holds the zero candle.
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.on_bar(0, Candle::new(f64::NAN, 1.0, 1.0, 1.0));
        assert_eq!(engine.candle(0), Candle::default());
        assert_eq!(engine.value(SeriesKey::HaClose, 0), 0.0);
    }

    #[test]
    fn revision_matches_fresh_computation() {
        let bars = rising(30);
        let mut revised = Engine::new(EngineConfig::default()).unwrap();
        for (i, candle) in bars.iter().enumerate() {
            if i == 29 {
                revised.on_bar(i, Candle::flat(50.0));
            }
            revised.on_bar(i, *candle);
        }
        let mut fresh = Engine::new(EngineConfig::default()).unwrap();
        fresh.load_history(&bars);
        for key in SeriesKey::ALL {
            assert_eq!(revised.value(key, 29), fresh.value(key, 29), "{key}");
        }
    }

    #[test]
    fn reset_clears_candles() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.load_history(&rising(10));
        engine.reset();
        assert!(engine.is_empty());
        assert_eq!(engine.value(SeriesKey::HaClose, 3), 0.0);
    }

    #[test]
    fn threshold_bands_from_bar_one() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.load_history(&rising(3));
        assert_eq!(engine.band(BandKey::Overbought, 0), None);
        assert_eq!(engine.band(BandKey::Overbought, 1), Some(Band::new(100.0, 80.0)));
        assert_eq!(engine.band(BandKey::Oversold, 2), Some(Band::new(20.0, 0.0)));
        assert_eq!(engine.band(BandKey::Oversold, 3), None);
    }

    #[test]
    fn price_cross_marker_and_alert() {
        let mut config = EngineConfig::default();
        config.price_cross.enabled = true;
        config.price_cross.period = 3;
        config.alerts.timing = AlertTiming::Intrabar;
        let mut engine = Engine::new(config).unwrap();
        engine.set_instrument(Some(es())).unwrap();
        let sink = MemorySink::new();
        engine.set_alert_sink(Box::new(sink.clone()));

        // Closes 10, 10, 10, 10 then a jump to 14: SMA(3) at bar 4 is 11.33.
        let closes = [10.0, 10.0, 10.0, 10.0, 14.0];
        let mut events = Vec::new();
        for (i, &c) in closes.iter().enumerate() {
            events.extend(engine.on_bar(i, Candle::new(c, c + 0.5, c - 0.5, c)));
        }
        let cross: Vec<_> = events
            .iter()
            .filter(|e| matches!(e.category, SignalCategory::PriceCross(_)))
            .collect();
        assert_eq!(cross.len(), 1);
        assert_eq!(cross[0].category, SignalCategory::PriceCross(Direction::Long));
        assert_eq!(cross[0].bar_index, 4);
        assert_eq!(cross[0].price, Some(13.5 - 0.25));
        assert_eq!(engine.value(SeriesKey::PriceCrossMarker, 4), 13.25);
        assert_eq!(
            cross[0].message,
            "BUY SIGNAL: Price crossed and closed above the 3 SMA"
        );

        let alerts = sink.alerts();
        let alert = alerts
            .iter()
            .find(|a| a.message == cross[0].message)
            .unwrap();
        assert_eq!(alert.instrument, "ES");
        assert_eq!(alert.foreground, crate::signals::Color::GREEN);
    }

    #[test]
    fn engine_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Engine>();
    }
}
