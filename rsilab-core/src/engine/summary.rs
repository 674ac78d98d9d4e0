//! Performance summary over a trade list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{Outcome, Trade};

/// Per-outcome aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeStats {
    pub count: usize,
    pub mean_return: f64,
    pub total_days: i64,
    pub mean_days: f64,
}

/// Trade-level summary of one backtest.
///
/// `by_outcome` only holds classes that occurred; it is empty when there are
/// no trades.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub by_outcome: BTreeMap<Outcome, OutcomeStats>,
    /// Compounded return of all trades.
    pub total_return: f64,
    /// Sum of holding days across all trades.
    pub days_in_market: i64,
    /// `(1 + total_return)^(365 / days_in_market) - 1`; 0 with no days in market.
    pub annualized_return: f64,
}

impl SummaryMetrics {
    pub fn trade_count(&self) -> usize {
        self.by_outcome.values().map(|s| s.count).sum()
    }

    pub fn stats(&self, outcome: Outcome) -> Option<&OutcomeStats> {
        self.by_outcome.get(&outcome)
    }

    /// Fraction of trades that won. 0 with no trades.
    pub fn win_rate(&self) -> f64 {
        let total = self.trade_count();
        if total == 0 {
            return 0.0;
        }
        self.stats(Outcome::Win).map_or(0, |s| s.count) as f64 / total as f64
    }
}

/// Summarize a trade list.
pub fn summarize(trades: &[Trade]) -> SummaryMetrics {
    let Some(last) = trades.last() else {
        return SummaryMetrics::default();
    };

    let mut groups: BTreeMap<Outcome, (usize, f64, i64)> = BTreeMap::new();
    for t in trades {
        let g = groups.entry(t.outcome).or_insert((0, 0.0, 0));
        g.0 += 1;
        g.1 += t.return_pct;
        g.2 += t.holding_days;
    }

    let by_outcome: BTreeMap<Outcome, OutcomeStats> = groups
        .into_iter()
        .map(|(outcome, (count, return_sum, days))| {
            (
                outcome,
                OutcomeStats {
                    count,
                    mean_return: return_sum / count as f64,
                    total_days: days,
                    mean_days: days as f64 / count as f64,
                },
            )
        })
        .collect();

    let total_return = last.cumulative_return;
    let days_in_market: i64 = by_outcome.values().map(|s| s.total_days).sum();

    SummaryMetrics {
        by_outcome,
        total_return,
        days_in_market,
        annualized_return: annualized_return(total_return, days_in_market),
    }
}

/// Geometric 365-day annualization. 0 when `days` is not positive.
pub fn annualized_return(total_return: f64, days: i64) -> f64 {
    if days <= 0 {
        return 0.0;
    }
    (1.0 + total_return).powf(365.0 / days as f64) - 1.0
}
