//! Look-ahead contamination tests for every incremental component.
//!
//! No value at bar t may depend on a candle from bar t+1 or later.
//!
//! Method: compute on a truncated series (bars 0..100) and the full series
//! (bars 0..200). Bars 0..100 must be identical between both runs.

use paperlab_core::domain::Candle;
use paperlab_core::engine::OscillatorConfig;
use paperlab_core::indicators::{Adx, Ema, Indicator, MaType, MovingAverage, Sma};
use paperlab_core::oscillator::{LaguerreRsi, OscillatorMode};
use paperlab_core::series::Series;

/// Generate N candles of synthetic data with realistic variation.
fn make_test_candles(n: usize) -> Series<Candle> {
    let mut series = Series::new();
    let mut price = 100.0;
    for i in 0..n {
        // Deterministic pseudo-random walk using a simple LCG
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05;
        price = (price + change).max(10.0);

        let open = price - 0.5;
        let close = price + 0.3;
        let high = open.max(close) + 2.0;
        let low = open.min(close) - 2.0;
        series.set(i, Candle::new(open, high, low, close));
    }
    series
}

fn prefix(candles: &Series<Candle>, len: usize) -> Series<Candle> {
    let mut out = Series::new();
    for (i, c) in candles.as_slice().iter().take(len).enumerate() {
        out.set(i, *c);
    }
    out
}

fn assert_no_lookahead<I: Indicator + Clone>(indicator: &I, full: &Series<Candle>, len: usize) {
    let truncated = prefix(full, len);
    let mut a = indicator.clone();
    let mut b = indicator.clone();
    let short: Vec<f64> = (0..truncated.len()).map(|i| a.update(i, &truncated)).collect();
    let long: Vec<f64> = (0..full.len()).map(|i| b.update(i, full)).collect();
    for i in 0..len {
        assert_eq!(
            short[i].to_bits(),
            long[i].to_bits(),
            "{} leaks future data at bar {i}",
            indicator.name()
        );
    }
}

#[test]
fn moving_averages_have_no_lookahead() {
    let candles = make_test_candles(200);
    assert_no_lookahead(&Sma::new(20), &candles, 100);
    assert_no_lookahead(&Ema::new(20), &candles, 100);
    assert_no_lookahead(&MovingAverage::new(MaType::Ema, 9), &candles, 100);
}

#[test]
fn adx_has_no_lookahead() {
    let candles = make_test_candles(200);
    assert_no_lookahead(&Adx::new(14, 14), &candles, 100);
    assert_no_lookahead(&Adx::new(5, 3), &candles, 100);
}

#[test]
fn laguerre_rsi_has_no_lookahead() {
    let candles = make_test_candles(200);
    for mode in [OscillatorMode::Classic, OscillatorMode::FractalEnergy] {
        let config = OscillatorConfig {
            mode,
            ..OscillatorConfig::default()
        };
        let mut short = LaguerreRsi::new(&config);
        let mut long = LaguerreRsi::new(&config);
        for i in 0..100 {
            short.update(i, &candles.get(i));
        }
        for i in 0..200 {
            long.update(i, &candles.get(i));
        }
        for i in 0..100 {
            assert_eq!(short.value(i).to_bits(), long.value(i).to_bits(), "{mode:?} bar {i}");
            assert_eq!(short.fractal_gamma(i).to_bits(), long.fractal_gamma(i).to_bits());
        }
    }
}
