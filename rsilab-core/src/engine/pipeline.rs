//! Full pipeline: bars + params in, every derived table out.

use serde::{Deserialize, Serialize};

use super::compress::compress_actions;
use super::precompute::precompute_indicators;
use super::replay::replay_equity_curve;
use super::signal_rules::{generate_signals, SignalThresholds};
use super::summary::{summarize, SummaryMetrics};
use super::trade_pairing::pair_trades;
use super::warmup::drop_warmup;
use crate::domain::{Action, EquityCurveRow, IndicatorRow, PriceBar, SignalRow, Trade};
use crate::error::{BacktestError, BacktestWarning};
use crate::params::StrategyParams;

/// Everything one backtest produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestOutput {
    /// One row per input bar, warm-up rows included.
    pub indicators: Vec<IndicatorRow>,
    /// Warmed-up rows with their daily signal.
    pub signals: Vec<SignalRow>,
    pub actions: Vec<Action>,
    pub trades: Vec<Trade>,
    pub summary: SummaryMetrics,
    /// One row per signal row.
    pub equity_curve: Vec<EquityCurveRow>,
    pub warnings: Vec<BacktestWarning>,
}

impl BacktestOutput {
    /// Bars dropped before signal generation.
    pub fn warmup_bars(&self) -> usize {
        self.indicators.len() - self.signals.len()
    }
}

/// Run the whole pipeline over one instrument's bars.
///
/// An empty series, or one too short to warm up, is not an error: it yields
/// empty tables, zero metrics and a `NoData` warning.
pub fn run_pipeline(
    bars: &[PriceBar],
    params: &StrategyParams,
) -> Result<BacktestOutput, BacktestError> {
    params.validate()?;
    let mut warnings = Vec::new();

    let indicators = precompute_indicators(bars, params);
    let warm = drop_warmup(&indicators);
    if warm.is_empty() {
        tracing::warn!(
            bars = bars.len(),
            warmup = params.warmup_bars(),
            "no data after indicator warm-up"
        );
        warnings.push(BacktestWarning::NoData);
    }

    let signals = generate_signals(&warm, &SignalThresholds::from(params));
    let actions = compress_actions(&signals, params.direction);
    let trades = pair_trades(&actions, params.direction, params.transaction_cost)?;
    let summary = summarize(&trades);

    let replay = replay_equity_curve(&signals, params.direction);
    if let Some(date) = replay.open_at_end {
        warnings.push(BacktestWarning::OpenPositionAtEnd { date });
    }

    tracing::debug!(
        bars = bars.len(),
        signal_rows = signals.len(),
        actions = actions.len(),
        trades = trades.len(),
        "pipeline complete"
    );

    Ok(BacktestOutput {
        indicators,
        signals,
        actions,
        trades,
        summary,
        equity_curve: replay.rows,
        warnings,
    })
}
