//! Threshold signal rules.
//!
//! Each row is classified on its own, with no memory of previous rows:
//! - Buy  when crossover >= buy_crossover_min  AND rsi >= buy_rsi_min
//! - Sell when crossover <= sell_crossover_max AND rsi <= sell_rsi_min
//! - None otherwise
//!
//! Sell is evaluated after Buy and overwrites it, so Sell wins when both hold.

use serde::{Deserialize, Serialize};

use crate::domain::{IndicatorRow, Signal, SignalRow};
use crate::params::StrategyParams;

/// The four thresholds of the signal rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    pub buy_crossover_min: f64,
    pub buy_rsi_min: f64,
    pub sell_crossover_max: f64,
    pub sell_rsi_min: f64,
}

impl From<&StrategyParams> for SignalThresholds {
    fn from(p: &StrategyParams) -> Self {
        Self {
            buy_crossover_min: p.buy_crossover_min,
            buy_rsi_min: p.buy_rsi_min,
            sell_crossover_max: p.sell_crossover_max,
            sell_rsi_min: p.sell_rsi_min,
        }
    }
}

impl SignalThresholds {
    pub fn classify(&self, crossover: f64, rsi: f64) -> Signal {
        let mut signal = Signal::None;
        if crossover >= self.buy_crossover_min && rsi >= self.buy_rsi_min {
            signal = Signal::Buy;
        }
        if crossover <= self.sell_crossover_max && rsi <= self.sell_rsi_min {
            signal = Signal::Sell;
        }
        signal
    }
}

/// Attach a signal to every warmed-up row.
///
/// Rows with an undefined indicator are skipped, so the output only contains
/// rows the rules could actually evaluate.
pub fn generate_signals(rows: &[IndicatorRow], thresholds: &SignalThresholds) -> Vec<SignalRow> {
    rows.iter()
        .filter_map(|row| {
            let (crossover, rsi) = (row.crossover?, row.rsi?);
            Some(SignalRow {
                bar: row.bar.clone(),
                crossover,
                rsi,
                signal: thresholds.classify(crossover, rsi),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> SignalThresholds {
        SignalThresholds {
            buy_crossover_min: 0.0,
            buy_rsi_min: 60.0,
            sell_crossover_max: 0.0,
            sell_rsi_min: 35.0,
        }
    }

    #[test]
    fn buy_sell_none() {
        let t = thresholds();
        assert_eq!(t.classify(1.5, 70.0), Signal::Buy);
        assert_eq!(t.classify(-1.5, 20.0), Signal::Sell);
        assert_eq!(t.classify(1.5, 50.0), Signal::None);
        assert_eq!(t.classify(-1.5, 50.0), Signal::None);
    }

    #[test]
    fn thresholds_are_inclusive() {
        let t = thresholds();
        assert_eq!(t.classify(0.0, 60.0), Signal::Buy);
        assert_eq!(t.classify(0.0, 35.0), Signal::Sell);
    }

    #[test]
    fn sell_wins_ties() {
        // Overlapping thresholds: both rules hold for crossover 0, rsi 50
        let t = SignalThresholds {
            buy_crossover_min: -1.0,
            buy_rsi_min: 40.0,
            sell_crossover_max: 1.0,
            sell_rsi_min: 60.0,
        };
        assert_eq!(t.classify(0.0, 50.0), Signal::Sell);
    }

    #[test]
    fn undefined_rows_are_skipped() {
        use crate::indicators::make_bars;
        let bars = make_bars(&[1.0, 2.0]);
        let rows = vec![
            IndicatorRow {
                bar: bars[0].clone(),
                crossover: None,
                rsi: Some(80.0),
            },
            IndicatorRow {
                bar: bars[1].clone(),
                crossover: Some(2.0),
                rsi: Some(80.0),
            },
        ];
        let out = generate_signals(&rows, &thresholds());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].bar.date, bars[1].date);
        assert_eq!(out[0].signal, Signal::Buy);
    }
}
