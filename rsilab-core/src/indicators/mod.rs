//! Indicator implementations.
//!
//! Indicators are pure functions: bar history in, numeric series out. Each
//! is computed once over the whole series before signals are evaluated.

pub mod crossover;
pub mod ewm;
pub mod rsi;
pub mod sma;

pub use crossover::Crossover;
pub use ewm::ewm_mean;
pub use rsi::Rsi;
pub use sma::{rolling_mean, Sma};

use crate::domain::PriceBar;

/// Trait for indicators.
///
/// `compute` returns a series the same length as `bars`; the first
/// `lookback()` values are `f64::NAN` (warm-up).
///
/// # Look-ahead guard
/// No indicator value at bar t may depend on price data from bar t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;
}

/// Create synthetic bars from close prices for testing.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    use crate::domain::RawBar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let raw: Vec<RawBar> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| RawBar {
            date: base_date + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        })
        .collect();
    PriceBar::series_from_raw(&raw)
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
