//! Relative Strength Index (RSI).
//!
//! Gains and losses of the close-to-close change are each smoothed with an
//! adjusted EWM (`alpha = 1 / period`), then
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! The first bar has no prior close; its change counts as zero, as does any
//! change that is not finite, so a bad close only disturbs its own bar.
//! Lookback: period.
//! Edge cases: avg_loss == 0 → RSI = 100; no movement at all → RSI = 50.

use super::ewm::ewm_mean;
use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n <= self.period {
            return result;
        }

        let mut gains = vec![0.0; n];
        let mut losses = vec![0.0; n];
        for i in 1..n {
            let change = bars[i].close - bars[i - 1].close;
            if !change.is_finite() {
                continue;
            }
            if change > 0.0 {
                gains[i] = change;
            } else {
                losses[i] = -change;
            }
        }

        let alpha = 1.0 / self.period as f64;
        let avg_gain = ewm_mean(&gains, alpha);
        let avg_loss = ewm_mean(&losses, alpha);

        for i in self.period..n {
            result[i] = compute_rsi(avg_gain[i], avg_loss[i]);
        }

        result
    }
}

/// RSI from smoothed averages, with the zero-loss policy applied.
pub fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain.is_nan() || avg_loss.is_nan() {
        f64::NAN
    } else if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn rsi_all_gains() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[3], 100.0, 1e-9);
        assert_approx(result[5], 100.0, 1e-9);
    }

    #[test]
    fn rsi_all_losses() {
        let bars = make_bars(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[3], 0.0, 1e-9);
    }

    #[test]
    fn rsi_flat_is_fifty() {
        let bars = make_bars(&[50.0; 8]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[7], 50.0, 1e-9);
    }

    #[test]
    fn rsi_known_values() {
        // changes [0, 1, -1, 2], alpha = 0.5
        // avg_gain[2] = 0.5/1.75, avg_loss[2] = 1/1.75 → rs 0.5 → 33.33
        // avg_gain[3] = 2.25/1.875, avg_loss[3] = 0.5/1.875 → rs 4.5 → 81.82
        let bars = make_bars(&[10.0, 11.0, 10.0, 12.0]);
        let result = Rsi::new(2).compute(&bars);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 100.0 - 100.0 / 1.5, 1e-9);
        assert_approx(result[3], 100.0 - 100.0 / 5.5, 1e-9);
    }

    #[test]
    fn rsi_bounds() {
        let bars = make_bars(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let result = Rsi::new(3).compute(&bars);
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!((0.0..=100.0).contains(&v), "RSI out of bounds at bar {i}: {v}");
            }
        }
    }

    #[test]
    fn rsi_recovers_after_nan_close() {
        let mut closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.9).sin() * 4.0).collect();
        closes[10] = f64::NAN;
        let result = Rsi::new(5).compute(&make_bars(&closes));
        for (i, &v) in result.iter().enumerate().skip(5) {
            assert!((0.0..=100.0).contains(&v), "RSI undefined at bar {i}: {v}");
        }
    }

    #[test]
    fn rsi_too_few_bars() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        assert!(Rsi::new(3).compute(&bars).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(14).lookback(), 14);
    }
}
