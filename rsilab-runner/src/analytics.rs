//! Calendar-year return analytics for the strategy and for buy-and-hold.
//!
//! For each year with at least one equity-curve row:
//! - compounded return `Π(1 + r) - 1`
//! - value-at-risk: the `VAR_ALPHA` quantile of daily returns (linear interpolation)
//! - Sharpe-like ratio: yearly return / sample std of daily returns (0 when undefined)
//!
//! Buy-and-hold uses each day's close-to-close change; the strategy uses the
//! replayed strategy return.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use rsilab_core::domain::EquityCurveRow;

/// Tail probability for value-at-risk.
pub const VAR_ALPHA: f64 = 0.05;

/// Return statistics over one window of daily returns.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReturnStats {
    pub total_return: f64,
    pub var: f64,
    pub sharpe: f64,
}

/// One calendar year, strategy next to buy-and-hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyStats {
    pub year: i32,
    pub days: usize,
    pub strategy: ReturnStats,
    pub buy_hold: ReturnStats,
}

/// Group the equity curve by calendar year, in ascending year order.
pub fn yearly_stats(curve: &[EquityCurveRow]) -> Vec<YearlyStats> {
    let mut years: BTreeMap<i32, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for r in curve {
        let (strategy, buy_hold) = years.entry(r.row.bar.date.year()).or_default();
        strategy.push(r.strategy_return);
        if let Some(change) = r.row.bar.pct_change {
            buy_hold.push(change);
        }
    }

    years
        .into_iter()
        .map(|(year, (strategy, buy_hold))| YearlyStats {
            year,
            days: strategy.len(),
            strategy: return_stats(&strategy),
            buy_hold: return_stats(&buy_hold),
        })
        .collect()
}

pub fn return_stats(returns: &[f64]) -> ReturnStats {
    let total_return = compounded(returns);
    let std = sample_std(returns);
    let sharpe = if std > 0.0 && std.is_finite() {
        total_return / std
    } else {
        0.0
    };
    ReturnStats {
        total_return,
        var: quantile(returns, VAR_ALPHA),
        sharpe,
    }
}

/// `Π(1 + r) - 1`; 0 for an empty slice.
pub fn compounded(returns: &[f64]) -> f64 {
    returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0
}

/// Sample standard deviation (n - 1). 0 with fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    var.sqrt()
}

/// Quantile `q` in [0, 1] with linear interpolation between order
/// statistics. 0 for an empty slice.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
