//! Indicator precomputation: bars in, one `IndicatorRow` per bar out.

use crate::domain::{IndicatorRow, PriceBar};
use crate::indicators::{Crossover, Indicator, Rsi};
use crate::params::StrategyParams;

/// Compute crossover and RSI for every bar.
///
/// The output has the same length and order as `bars`. Warm-up bars carry
/// `None` for whichever indicator is not yet defined.
pub fn precompute_indicators(bars: &[PriceBar], params: &StrategyParams) -> Vec<IndicatorRow> {
    let crossover = Crossover::new(params.fast, params.slow);
    let rsi = Rsi::new(params.rsi_period);

    let crossover_values = crossover.compute(bars);
    let rsi_values = rsi.compute(bars);
    debug_assert_eq!(crossover_values.len(), bars.len());
    debug_assert_eq!(rsi_values.len(), bars.len());

    bars.iter()
        .zip(crossover_values)
        .zip(rsi_values)
        .map(|((bar, c), r)| IndicatorRow {
            bar: bar.clone(),
            crossover: defined(c),
            rsi: defined(r),
        })
        .collect()
}

fn defined(v: f64) -> Option<f64> {
    if v.is_nan() {
        None
    } else {
        Some(v)
    }
}
