//! Warm-up trimming.

use crate::domain::IndicatorRow;

/// Keep only rows where both crossover and RSI are defined.
pub fn drop_warmup(rows: &[IndicatorRow]) -> Vec<IndicatorRow> {
    rows.iter().filter(|r| r.is_warm()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::precompute::precompute_indicators;
    use crate::indicators::make_bars;
    use crate::params::StrategyParams;

    #[test]
    fn drops_exactly_the_warmup_bars() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let params = StrategyParams {
            fast: 3,
            slow: 8,
            rsi_period: 5,
            ..Default::default()
        };
        let rows = precompute_indicators(&make_bars(&closes), &params);
        let warm = drop_warmup(&rows);
        assert_eq!(warm.len(), 30 - params.warmup_bars());
        assert_eq!(warm[0].bar.date, rows[params.warmup_bars()].bar.date);
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(drop_warmup(&[]).is_empty());
    }
}
