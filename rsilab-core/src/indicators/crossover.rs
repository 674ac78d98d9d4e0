//! Moving-average crossover, as a percentage gap.
//!
//! crossover = (SMA(fast) / SMA(slow) - 1) * 100
//! Lookback: max(fast, slow) - 1.

use super::sma::Sma;
use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Crossover {
    fast: Sma,
    slow: Sma,
    name: String,
}

impl Crossover {
    pub fn new(fast: usize, slow: usize) -> Self {
        Self {
            fast: Sma::new(fast),
            slow: Sma::new(slow),
            name: format!("crossover_{fast}_{slow}"),
        }
    }
}

impl Indicator for Crossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.fast.lookback().max(self.slow.lookback())
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let fast = self.fast.compute(bars);
        let slow = self.slow.compute(bars);
        fast.iter()
            .zip(&slow)
            .map(|(&f, &s)| {
                if f.is_nan() || s.is_nan() || s == 0.0 {
                    f64::NAN
                } else {
                    (f / s - 1.0) * 100.0
                }
            })
            .collect()
    }
}
