//! Serializable engine configuration.
//!
//! Every section is `#[serde(default)]`, so a TOML file only needs the keys it
//! changes:
//!
//! ```toml
//! [oscillator]
//! mode = "classic"
//!
//! [ma_cloud]
//! fast_period = 5
//! slow_period = 13
//! ```

use crate::domain::Direction;
use crate::indicators::MaType;
use crate::oscillator::{OscillatorMode, ThresholdEdge, ThresholdLevels};
use crate::signals::{AlertStyle, Color, ExitReason, SignalCategory};
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Complete configuration for one engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub oscillator: OscillatorConfig,
    pub thresholds: ThresholdConfig,
    pub ma_cloud: MaCloudConfig,
    pub adx: AdxConfig,
    pub price_cross: PriceCrossConfig,
    pub signals: SignalsConfig,
    pub alerts: AlertsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorConfig {
    pub mode: OscillatorMode,
    /// Classic Laguerre coefficient; damping is `1 - alpha`.
    pub alpha: f64,
    /// Fractal-energy window.
    pub nfe: usize,
    pub gaussian_length: usize,
    pub beta_dev: usize,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            mode: OscillatorMode::FractalEnergy,
            alpha: 0.2,
            nfe: 8,
            gaussian_length: 13,
            beta_dev: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub overbought: f64,
    pub oversold: f64,
    pub alerts: ThresholdAlerts,
    pub overbought_style: AlertStyle,
    pub oversold_style: AlertStyle,
}

impl ThresholdConfig {
    pub fn levels(&self) -> ThresholdLevels {
        ThresholdLevels::new(self.overbought, self.oversold)
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            overbought: 80.0,
            oversold: 20.0,
            alerts: ThresholdAlerts::default(),
            overbought_style: AlertStyle::on_black(Color::RED),
            oversold_style: AlertStyle::on_black(Color::GREEN),
        }
    }
}

/// One switch per edge kind; it gates both the event and the alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdAlerts {
    pub enter_overbought: bool,
    pub exit_overbought: bool,
    pub enter_oversold: bool,
    pub exit_oversold: bool,
}

impl ThresholdAlerts {
    pub fn enabled(&self, edge: ThresholdEdge) -> bool {
        match edge {
            ThresholdEdge::EnterOverbought => self.enter_overbought,
            ThresholdEdge::ExitOverbought => self.exit_overbought,
            ThresholdEdge::EnterOversold => self.enter_oversold,
            ThresholdEdge::ExitOversold => self.exit_oversold,
        }
    }
}

impl Default for ThresholdAlerts {
    fn default() -> Self {
        Self {
            enter_overbought: true,
            exit_overbought: true,
            enter_oversold: true,
            exit_oversold: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaCloudConfig {
    pub ma_type: MaType,
    pub fast_period: usize,
    pub slow_period: usize,
}

impl Default for MaCloudConfig {
    fn default() -> Self {
        Self {
            ma_type: MaType::Ema,
            fast_period: 9,
            slow_period: 21,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdxConfig {
    pub period: usize,
    pub smooth_period: usize,
    pub medium_threshold: f64,
    pub strong_threshold: f64,
}

impl Default for AdxConfig {
    fn default() -> Self {
        Self {
            period: 14,
            smooth_period: 14,
            medium_threshold: 15.0,
            strong_threshold: 23.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceCrossConfig {
    pub enabled: bool,
    pub ma_type: MaType,
    pub period: usize,
    pub offset_ticks: u32,
    pub alert: bool,
    pub buy_style: AlertStyle,
    pub sell_style: AlertStyle,
}

impl Default for PriceCrossConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ma_type: MaType::Sma,
            period: 9,
            offset_ticks: 1,
            alert: true,
            buy_style: AlertStyle::on_black(Color::GREEN),
            sell_style: AlertStyle::on_black(Color::RED),
        }
    }
}

/// Switches and alert colors for one signal category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Compute the marker and emit the event.
    pub enabled: bool,
    /// Also hand the event to the alert sink.
    pub alert: bool,
    pub style: AlertStyle,
}

impl CategoryConfig {
    pub fn new(foreground: Color) -> Self {
        Self {
            enabled: true,
            alert: true,
            style: AlertStyle::on_black(foreground),
        }
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self::new(Color::WHITE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalsConfig {
    pub reentry_offset_ticks: u32,
    pub exit_offset_ticks: u32,
    pub enter_long: CategoryConfig,
    pub enter_short: CategoryConfig,
    pub reenter_long: CategoryConfig,
    pub reenter_short: CategoryConfig,
    pub exit_long_flat_top: CategoryConfig,
    pub exit_long_trend_dot: CategoryConfig,
    pub exit_short_flat_bottom: CategoryConfig,
    pub exit_short_trend_dot: CategoryConfig,
}

impl Default for SignalsConfig {
    fn default() -> Self {
        Self {
            reentry_offset_ticks: 4,
            exit_offset_ticks: 7,
            enter_long: CategoryConfig::new(Color::GREEN.with_alpha(127)),
            enter_short: CategoryConfig::new(Color::RED.with_alpha(127)),
            reenter_long: CategoryConfig::new(Color::GREEN),
            reenter_short: CategoryConfig::new(Color::RED),
            exit_long_flat_top: CategoryConfig::new(Color::GREEN),
            exit_long_trend_dot: CategoryConfig::new(Color::GREEN),
            exit_short_flat_bottom: CategoryConfig::new(Color::RED),
            exit_short_trend_dot: CategoryConfig::new(Color::RED),
        }
    }
}

/// When fired signals are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertTiming {
    /// When bar `i` first arrives, emit the now-closed bar `i - 1`.
    #[default]
    BarClose,
    /// Emit bar `i` on every update of it, once per category.
    Intrabar,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    pub timing: AlertTiming,
}

fn require_period(value: usize, field: &'static str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroPeriod { field });
    }
    Ok(())
}

fn require_level(value: f64, field: &'static str) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::LevelOutOfRange { field, value });
    }
    Ok(())
}

fn require_threshold(value: f64, field: &'static str) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidThreshold { field, value });
    }
    Ok(())
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let osc = &self.oscillator;
        if !(osc.alpha > 0.0 && osc.alpha <= 1.0) {
            return Err(ConfigError::InvalidAlpha(osc.alpha));
        }
        require_period(osc.nfe, "oscillator.nfe")?;
        require_period(osc.gaussian_length, "oscillator.gaussian_length")?;
        // A one-bar period zeroes the Gaussian alpha and flattens the oscillator.
        if osc.gaussian_length < 2 {
            return Err(ConfigError::GaussianLengthTooShort(osc.gaussian_length));
        }
        require_period(osc.beta_dev, "oscillator.beta_dev")?;

        let th = &self.thresholds;
        require_level(th.overbought, "thresholds.overbought")?;
        require_level(th.oversold, "thresholds.oversold")?;
        if th.oversold >= th.overbought {
            return Err(ConfigError::LevelsInverted {
                oversold: th.oversold,
                overbought: th.overbought,
            });
        }

        let cloud = &self.ma_cloud;
        require_period(cloud.fast_period, "ma_cloud.fast_period")?;
        require_period(cloud.slow_period, "ma_cloud.slow_period")?;
        if cloud.fast_period >= cloud.slow_period {
            return Err(ConfigError::MaPeriodsInverted {
                fast: cloud.fast_period,
                slow: cloud.slow_period,
            });
        }

        let adx = &self.adx;
        require_period(adx.period, "adx.period")?;
        require_period(adx.smooth_period, "adx.smooth_period")?;
        require_threshold(adx.medium_threshold, "adx.medium_threshold")?;
        require_threshold(adx.strong_threshold, "adx.strong_threshold")?;
        if adx.medium_threshold >= adx.strong_threshold {
            return Err(ConfigError::AdxThresholdsInverted {
                medium: adx.medium_threshold,
                strong: adx.strong_threshold,
            });
        }

        require_period(self.price_cross.period, "price_cross.period")?;
        Ok(())
    }

    /// BLAKE3 of the canonical JSON form. Equal configs share a fingerprint.
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_string(self)?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }

    /// Effective switches and colors for `category`.
    pub fn category(&self, category: SignalCategory) -> CategoryConfig {
        let s = &self.signals;
        match category {
            SignalCategory::EnterLong => s.enter_long.clone(),
            SignalCategory::EnterShort => s.enter_short.clone(),
            SignalCategory::ReenterLong => s.reenter_long.clone(),
            SignalCategory::ReenterShort => s.reenter_short.clone(),
            SignalCategory::ExitLong(ExitReason::OppositeTrendDot) => s.exit_long_trend_dot.clone(),
            SignalCategory::ExitLong(_) => s.exit_long_flat_top.clone(),
            SignalCategory::ExitShort(ExitReason::OppositeTrendDot) => {
                s.exit_short_trend_dot.clone()
            }
            SignalCategory::ExitShort(_) => s.exit_short_flat_bottom.clone(),
            SignalCategory::Threshold(edge) => {
                let on = self.thresholds.alerts.enabled(edge);
                CategoryConfig {
                    enabled: on,
                    alert: on,
                    style: if edge.is_overbought() {
                        self.thresholds.overbought_style
                    } else {
                        self.thresholds.oversold_style
                    },
                }
            }
            SignalCategory::PriceCross(direction) => CategoryConfig {
                enabled: self.price_cross.enabled,
                alert: self.price_cross.alert,
                style: match direction {
                    Direction::Long => self.price_cross.buy_style,
                    Direction::Short => self.price_cross.sell_style,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.oscillator.mode, OscillatorMode::FractalEnergy);
        assert_eq!(config.ma_cloud.ma_type, MaType::Ema);
        assert_eq!(config.signals.exit_offset_ticks, 7);
        assert!(!config.price_cross.enabled);
        assert_eq!(config.alerts.timing, AlertTiming::BarClose);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [oscillator]
            mode = "classic"
            alpha = 0.5

            [signals.exit_long_flat_top]
            enabled = false

            [alerts]
            timing = "intrabar"
            "#,
        )
        .unwrap();
        assert_eq!(config.oscillator.mode, OscillatorMode::Classic);
        assert_eq!(config.oscillator.alpha, 0.5);
        assert_eq!(config.oscillator.nfe, 8);
        assert!(!config.signals.exit_long_flat_top.enabled);
        assert!(config.signals.exit_long_flat_top.alert);
        assert_eq!(config.alerts.timing, AlertTiming::Intrabar);
        assert_eq!(config.thresholds.overbought, 80.0);
    }

    #[test]
    fn default_toml_round_trips() {
        let rendered = EngineConfig::default().to_toml_string().unwrap();
        let parsed = EngineConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(parsed, EngineConfig::default());
    }

    #[test]
    fn rejects_bad_values() {
        let mut c = EngineConfig::default();
        c.oscillator.alpha = 0.0;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidAlpha(_))));

        let mut c = EngineConfig::default();
        c.thresholds.oversold = 85.0;
        assert!(matches!(c.validate(), Err(ConfigError::LevelsInverted { .. })));

        let mut c = EngineConfig::default();
        c.thresholds.overbought = 120.0;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::LevelOutOfRange { field: "thresholds.overbought", .. })
        ));

        let mut c = EngineConfig::default();
        c.ma_cloud.fast_period = 21;
        assert!(matches!(c.validate(), Err(ConfigError::MaPeriodsInverted { .. })));

        let mut c = EngineConfig::default();
        c.adx.smooth_period = 0;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::ZeroPeriod { field: "adx.smooth_period" })
        ));

        let mut c = EngineConfig::default();
        c.adx.medium_threshold = 30.0;
        assert!(matches!(c.validate(), Err(ConfigError::AdxThresholdsInverted { .. })));

        let mut c = EngineConfig::default();
        c.oscillator.gaussian_length = 1;
        assert!(matches!(c.validate(), Err(ConfigError::GaussianLengthTooShort(1))));
        c.oscillator.gaussian_length = 2;
        assert!(c.validate().is_ok());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = EngineConfig::from_toml_str("[oscillator]\nmode = \"turbo\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn fingerprint_is_deterministic_and_sensitive() {
        let a = EngineConfig::default();
        let mut b = EngineConfig::default();
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        b.adx.period = 10;
        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);
    }

    #[test]
    fn category_lookup_maps_threshold_and_price_cross() {
        let mut c = EngineConfig::default();
        c.thresholds.alerts.exit_oversold = false;
        let cat = c.category(SignalCategory::Threshold(ThresholdEdge::ExitOversold));
        assert!(!cat.enabled && !cat.alert);
        assert_eq!(cat.style.foreground, Color::GREEN);

        let cat = c.category(SignalCategory::PriceCross(Direction::Short));
        assert!(!cat.enabled);
        assert_eq!(cat.style.foreground, Color::RED);

        let cat = c.category(SignalCategory::ExitShort(ExitReason::OppositeTrendDot));
        assert_eq!(cat, c.signals.exit_short_trend_dot);
    }
}
