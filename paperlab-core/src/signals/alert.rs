//! Alert dispatch: colors, sinks, and the per-category dedup ledger.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::SignalCategory;

/// RGBA color passed through to alert sinks untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Background and foreground of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertStyle {
    pub background: Color,
    pub foreground: Color,
}

impl AlertStyle {
    /// Black background with the given foreground.
    pub const fn on_black(foreground: Color) -> Self {
        Self {
            background: Color::BLACK,
            foreground,
        }
    }
}

impl Default for AlertStyle {
    fn default() -> Self {
        Self::on_black(Color::WHITE)
    }
}

/// An alert handed to the external sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub instrument: String,
    pub bar_index: usize,
    pub message: String,
    pub background: Color,
    pub foreground: Color,
}

/// Receiver for alerts (sound player, notifier, log, ...).
pub trait AlertSink {
    fn dispatch(&mut self, alert: &Alert);
}

/// Sink that keeps every alert in a shared buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    alerts: Arc<Mutex<Vec<Alert>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the alerts received so far.
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

impl AlertSink for MemorySink {
    fn dispatch(&mut self, alert: &Alert) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(alert.clone());
        }
    }
}

/// Last bar each category fired on. A category fires at most once per bar,
/// and at most one exit fires per bar whatever its side or reason.
#[derive(Debug, Clone, Default)]
pub struct AlertLedger {
    last_bar: HashMap<SignalCategory, usize>,
    last_exit_bar: Option<usize>,
}

impl AlertLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `category` at `bar`. Returns false if it already fired there,
    /// or if it is an exit and another exit already fired there.
    pub fn try_record(&mut self, category: SignalCategory, bar: usize) -> bool {
        if self.last_bar.get(&category) == Some(&bar) {
            return false;
        }
        if category.is_exit() {
            if self.last_exit_bar == Some(bar) {
                return false;
            }
            self.last_exit_bar = Some(bar);
        }
        self.last_bar.insert(category, bar);
        true
    }

    pub fn last_bar(&self, category: SignalCategory) -> Option<usize> {
        self.last_bar.get(&category).copied()
    }

    pub fn clear(&mut self) {
        self.last_bar.clear();
        self.last_exit_bar = None;
    }
}
