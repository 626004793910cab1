//! Replay feeds through one engine per instrument.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use paperlab_core::signals::{format_level, Alert, AlertSink};
use paperlab_core::{Engine, EngineConfig, Instrument, SignalEvent};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::feed::Feed;

/// Alert sink that writes alerts to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl AlertSink for TracingSink {
    fn dispatch(&mut self, alert: &Alert) {
        info!(
            instrument = %alert.instrument,
            bar = alert.bar_index,
            "ALERT {}",
            alert.message
        );
    }
}

/// A signal event with its instrument and bar time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedEvent {
    pub symbol: String,
    pub time: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub event: SignalEvent,
}

impl TimedEvent {
    /// One-line human-readable form.
    pub fn to_line(&self) -> String {
        let time = self
            .time
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let price = self
            .event
            .price
            .map(|p| format!(" @ {}", format_level(p)))
            .unwrap_or_default();
        format!(
            "{time} {:<8} #{:<6} {}{price}",
            self.symbol, self.event.bar_index, self.event.message
        )
    }
}

/// Outcome of replaying one feed.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub symbol: String,
    pub bars: usize,
    pub config_fingerprint: String,
    pub events: Vec<TimedEvent>,
}

/// Stream every bar of `feed` through a fresh engine, then flush the last bar.
pub fn replay_feed(feed: &Feed, config: &EngineConfig, tick_size: f64) -> Result<ReplayReport> {
    let mut engine = Engine::new(config.clone())?;
    let instrument = Instrument::new(feed.symbol.clone(), tick_size)
        .with_context(|| format!("invalid instrument for {}", feed.symbol))?;
    engine.set_instrument(Some(instrument))?;
    engine.set_alert_sink(Box::new(TracingSink));

    let mut raw = Vec::new();
    for (index, bar) in feed.bars.iter().enumerate() {
        raw.extend(engine.on_bar(index, bar.candle));
    }
    raw.extend(engine.flush());

    if engine.len() != feed.bars.len() {
        warn!(
            symbol = %feed.symbol,
            accepted = engine.len(),
            total = feed.bars.len(),
            "some bars were rejected"
        );
    }

    let events = raw
        .into_iter()
        .map(|event| TimedEvent {
            symbol: feed.symbol.clone(),
            time: feed.time(event.bar_index),
            event,
        })
        .collect::<Vec<_>>();
    info!(symbol = %feed.symbol, bars = feed.bars.len(), events = events.len(), "replay complete");

    Ok(ReplayReport {
        symbol: feed.symbol.clone(),
        bars: feed.bars.len(),
        config_fingerprint: config.fingerprint()?,
        events,
    })
}

/// Replay every feed in parallel, one engine each. Reports keep feed order.
pub fn replay_all(feeds: &[Feed], config: &EngineConfig, tick_size: f64) -> Result<Vec<ReplayReport>> {
    feeds
        .par_iter()
        .map(|feed| replay_feed(feed, config, tick_size))
        .collect()
}
