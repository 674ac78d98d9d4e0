//! Row types for the indicator, signal and equity-curve tables.

use serde::{Deserialize, Serialize};

use super::bar::PriceBar;
use super::signal::Signal;

/// A price bar with its indicator values. `None` marks warm-up bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub bar: PriceBar,
    pub crossover: Option<f64>,
    pub rsi: Option<f64>,
}

impl IndicatorRow {
    /// Both indicators are defined on this row.
    pub fn is_warm(&self) -> bool {
        self.crossover.is_some() && self.rsi.is_some()
    }
}

/// A warmed-up row (both indicators defined) with its daily signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    pub bar: PriceBar,
    pub crossover: f64,
    pub rsi: f64,
    pub signal: Signal,
}

/// A signal row extended with the replayed strategy return for that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityCurveRow {
    pub row: SignalRow,
    pub strategy_return: f64,
}
