//! Backtest runner — wires together data loading, the core pipeline and analytics.
//!
//! Two entry points:
//! - `run_single_backtest()`: loads bars per the config, then runs. Used by the CLI.
//! - `run_backtest_from_bars()`: takes pre-loaded bars. No I/O.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rsilab_core::domain::{DatasetHash, ParamsHash, PriceBar, RunId, Signal};
use rsilab_core::{run_pipeline, BacktestError, BacktestOutput, StrategyParams};

use crate::analytics::{yearly_stats, YearlyStats};
use crate::config::{BacktestConfig, ConfigError};
use crate::data_loader::{load_bars, LoadError, LoadOptions};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("backtest error: {0}")]
    Backtest(#[from] BacktestError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub symbol: String,
    /// First and last bar dates; empty when no bars were loaded.
    pub start_date: String,
    pub end_date: String,
    pub params: StrategyParams,
    pub params_hash: ParamsHash,
    pub dataset_hash: DatasetHash,
    pub run_id: String,
    pub has_synthetic: bool,
    pub bar_count: usize,
    pub warmup_bars: usize,
    /// Days with a Buy or Sell signal.
    pub signal_count: usize,
    pub output: BacktestOutput,
    pub yearly: Vec<YearlyStats>,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Run a single backtest from a `BacktestConfig`, loading its bars first.
pub fn run_single_backtest(
    config: &BacktestConfig,
    opts: &LoadOptions,
) -> Result<BacktestResult, RunError> {
    config.validate()?;
    let symbol = &config.backtest.symbol;
    let loaded = load_bars(symbol, config.backtest.prices.as_deref(), opts)?;

    run_backtest_from_bars(
        symbol,
        &loaded.bars,
        &config.strategy,
        loaded.dataset_hash,
        loaded.has_synthetic,
    )
}

/// Run a backtest on pre-loaded bars — no I/O.
pub fn run_backtest_from_bars(
    symbol: &str,
    bars: &[PriceBar],
    params: &StrategyParams,
    dataset_hash: DatasetHash,
    has_synthetic: bool,
) -> Result<BacktestResult, RunError> {
    let params_hash = params.params_hash();
    let run_id = RunId::new(params_hash.clone(), dataset_hash.clone());

    let span = tracing::info_span!(
        "run_backtest",
        symbol,
        bars = bars.len(),
        run_id = %run_id,
    );
    let _guard = span.enter();

    let output = run_pipeline(bars, params)?;
    let yearly = yearly_stats(&output.equity_curve);
    let signal_count = output
        .signals
        .iter()
        .filter(|r| r.signal != Signal::None)
        .count();

    tracing::info!(
        trades = output.trades.len(),
        total_return = output.summary.total_return,
        annualized_return = output.summary.annualized_return,
        "backtest complete"
    );

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        symbol: symbol.to_string(),
        start_date: bars.first().map(|b| b.date.to_string()).unwrap_or_default(),
        end_date: bars.last().map(|b| b.date.to_string()).unwrap_or_default(),
        params: params.clone(),
        params_hash,
        dataset_hash,
        run_id: run_id.hash(),
        has_synthetic,
        bar_count: bars.len(),
        warmup_bars: output.warmup_bars(),
        signal_count,
        output,
        yearly,
    })
}
