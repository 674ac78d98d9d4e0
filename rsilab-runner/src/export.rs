//! Reporting and export — JSON, CSV, and Markdown artifact generation.
//!
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: indicator, action, trade, equity and yearly tables
//! - **Markdown**: human-readable single-run report
//!
//! All persisted artifacts include a `schema_version` field. Unknown versions
//! are rejected on load.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rsilab_core::domain::{Action, EquityCurveRow, IndicatorRow, Outcome, SignalRow, Trade};
use rsilab_core::SummaryMetrics;

use crate::analytics::YearlyStats;
use crate::runner::{BacktestResult, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestResult` to pretty JSON.
pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

/// Deserialize a `BacktestResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BacktestResult> {
    let result: BacktestResult =
        serde_json::from_str(json).context("failed to deserialize BacktestResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.6}")).unwrap_or_default()
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// One row per input bar. Warm-up rows leave crossover, rsi and signal empty.
///
/// Columns: date, open, high, low, close, volume, volume_mln, pct_change,
/// crossover, rsi, signal
pub fn export_indicators_csv(indicators: &[IndicatorRow], signals: &[SignalRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "open",
        "high",
        "low",
        "close",
        "volume",
        "volume_mln",
        "pct_change",
        "crossover",
        "rsi",
        "signal",
    ])?;

    // signal rows are exactly the warm indicator rows, in order
    let mut signals = signals.iter();
    for r in indicators {
        let signal = if r.is_warm() {
            signals.next().map(|s| s.signal.as_str()).unwrap_or("")
        } else {
            ""
        };
        let b = &r.bar;
        wtr.write_record([
            &b.date.to_string(),
            &format!("{:.6}", b.open),
            &format!("{:.6}", b.high),
            &format!("{:.6}", b.low),
            &format!("{:.6}", b.close),
            &format!("{:.0}", b.volume),
            &format!("{:.6}", b.volume_mln),
            &opt(b.pct_change),
            &opt(r.crossover),
            &opt(r.rsi),
            signal,
        ])?;
    }
    finish(wtr)
}

/// Columns: date, price, action
pub fn export_actions_csv(actions: &[Action]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "price", "action"])?;
    for a in actions {
        wtr.write_record([
            &a.date.to_string(),
            &format!("{:.6}", a.price),
            a.signal.as_str(),
        ])?;
    }
    finish(wtr)
}

/// Columns: direction, entry_date, entry_price, exit_date, exit_price,
/// return, holding_days, outcome, cumulative_return
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "direction",
        "entry_date",
        "entry_price",
        "exit_date",
        "exit_price",
        "return",
        "holding_days",
        "outcome",
        "cumulative_return",
    ])?;
    for t in trades {
        wtr.write_record([
            t.direction.as_str(),
            &t.entry_date.to_string(),
            &format!("{:.6}", t.entry_price),
            &t.exit_date.to_string(),
            &format!("{:.6}", t.exit_price),
            &format!("{:.6}", t.return_pct),
            &t.holding_days.to_string(),
            &t.outcome.to_string(),
            &format!("{:.6}", t.cumulative_return),
        ])?;
    }
    finish(wtr)
}

/// Daily replay with compounded curves for the strategy and buy-and-hold.
///
/// Columns: date, close, pct_change, signal, strategy_return,
/// strategy_equity, buy_hold_equity
pub fn export_equity_csv(curve: &[EquityCurveRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "close",
        "pct_change",
        "signal",
        "strategy_return",
        "strategy_equity",
        "buy_hold_equity",
    ])?;
    let mut strategy = 1.0;
    let mut buy_hold = 1.0;
    for (i, r) in curve.iter().enumerate() {
        strategy *= 1.0 + r.strategy_return;
        // the first row is the starting point of both curves
        if i > 0 {
            buy_hold *= 1.0 + r.row.bar.pct_change.unwrap_or(0.0);
        }
        wtr.write_record([
            &r.row.bar.date.to_string(),
            &format!("{:.6}", r.row.bar.close),
            &opt(r.row.bar.pct_change),
            r.row.signal.as_str(),
            &format!("{:.6}", r.strategy_return),
            &format!("{strategy:.6}"),
            &format!("{buy_hold:.6}"),
        ])?;
    }
    finish(wtr)
}

/// Columns: year, days, strategy_return, strategy_var, strategy_sharpe,
/// buy_hold_return, buy_hold_var, buy_hold_sharpe
pub fn export_yearly_csv(yearly: &[YearlyStats]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "year",
        "days",
        "strategy_return",
        "strategy_var",
        "strategy_sharpe",
        "buy_hold_return",
        "buy_hold_var",
        "buy_hold_sharpe",
    ])?;
    for y in yearly {
        wtr.write_record([
            &y.year.to_string(),
            &y.days.to_string(),
            &format!("{:.6}", y.strategy.total_return),
            &format!("{:.6}", y.strategy.var),
            &format!("{:.6}", y.strategy.sharpe),
            &format!("{:.6}", y.buy_hold.total_return),
            &format!("{:.6}", y.buy_hold.var),
            &format!("{:.6}", y.buy_hold.sharpe),
        ])?;
    }
    finish(wtr)
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a single backtest run.
///
/// Creates a directory named `{symbol}_{timestamp}/` under `output_dir`
/// containing:
/// - `manifest.json` — the full `BacktestResult`
/// - `indicators.csv`, `actions.csv`, `trades.csv`, `equity.csv`, `yearly.csv`
/// - `report.md` — the Markdown report
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &BacktestResult, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        result.symbol,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let out = &result.output;
    let files = [
        ("manifest.json", export_json(result)?),
        (
            "indicators.csv",
            export_indicators_csv(&out.indicators, &out.signals)?,
        ),
        ("actions.csv", export_actions_csv(&out.actions)?),
        ("trades.csv", export_trades_csv(&out.trades)?),
        ("equity.csv", export_equity_csv(&out.equity_curve)?),
        ("yearly.csv", export_yearly_csv(&result.yearly)?),
        ("report.md", generate_report(result)),
    ];
    for (name, contents) in files {
        let path = run_dir.join(name);
        std::fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    tracing::info!(dir = %run_dir.display(), "artifacts saved");
    Ok(run_dir)
}

/// Load a `BacktestResult` from an artifact directory's manifest.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<BacktestResult> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}

// ─── Markdown report ────────────────────────────────────────────────

/// Per-outcome table as Markdown rows, rounded to 4 decimals.
pub fn outcome_table(summary: &SummaryMetrics) -> String {
    let mut md = String::new();
    md.push_str("| Outcome | Trades | Mean Return | Total Days | Mean Days |\n");
    md.push_str("| --- | ---: | ---: | ---: | ---: |\n");
    for outcome in [Outcome::Win, Outcome::Loss] {
        if let Some(s) = summary.stats(outcome) {
            let _ = writeln!(
                md,
                "| {outcome} | {} | {:.4} | {} | {:.4} |",
                s.count, s.mean_return, s.total_days, s.mean_days
            );
        }
    }
    md
}

/// Generate a Markdown report for a single backtest run.
pub fn generate_report(result: &BacktestResult) -> String {
    let mut md = String::with_capacity(2048);
    let p = &result.params;
    let s = &result.output.summary;

    md.push_str("# Backtest Report\n\n");

    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    let _ = writeln!(md, "| Symbol | {} |", result.symbol);
    let _ = writeln!(md, "| Period | {} to {} |", result.start_date, result.end_date);
    let _ = writeln!(
        md,
        "| Bars | {} ({} warmup) |",
        result.bar_count, result.warmup_bars
    );
    let _ = writeln!(md, "| Signal Days | {} |", result.signal_count);
    let _ = writeln!(md, "| Run ID | `{}` |", result.run_id);
    let _ = writeln!(md, "| Dataset Hash | `{}` |", result.dataset_hash);
    if result.has_synthetic {
        md.push_str("| Data | **SYNTHETIC** |\n");
    }
    md.push('\n');

    md.push_str("## Strategy\n\n");
    let _ = writeln!(
        md,
        "- {} crossover of SMA({}) / SMA({}), RSI({})",
        p.direction, p.fast, p.slow, p.rsi_period
    );
    let _ = writeln!(
        md,
        "- Buy when crossover >= {} and RSI >= {}",
        p.buy_crossover_min, p.buy_rsi_min
    );
    let _ = writeln!(
        md,
        "- Sell when crossover <= {} and RSI <= {}",
        p.sell_crossover_max, p.sell_rsi_min
    );
    md.push('\n');

    md.push_str("## Performance Summary\n\n");
    if s.trade_count() > 0 {
        md.push_str(&outcome_table(s));
        md.push('\n');
    }
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | --- |\n");
    let _ = writeln!(md, "| Trades | {} |", s.trade_count());
    let _ = writeln!(md, "| Win Rate | {:.4} |", s.win_rate());
    let _ = writeln!(md, "| Total Return | {:.4} |", s.total_return);
    let _ = writeln!(md, "| Days in Market | {} |", s.days_in_market);
    let _ = writeln!(md, "| TEA | {:.4} |", s.annualized_return);
    md.push('\n');

    if !result.yearly.is_empty() {
        md.push_str("## Yearly Returns\n\n");
        md.push_str("| Year | Strategy | VaR | Sharpe | Buy & Hold | VaR | Sharpe |\n");
        md.push_str("| --- | ---: | ---: | ---: | ---: | ---: | ---: |\n");
        for y in &result.yearly {
            let _ = writeln!(
                md,
                "| {} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4} |",
                y.year,
                y.strategy.total_return,
                y.strategy.var,
                y.strategy.sharpe,
                y.buy_hold.total_return,
                y.buy_hold.var,
                y.buy_hold.sharpe
            );
        }
        md.push('\n');
    }

    if !result.output.warnings.is_empty() {
        md.push_str("## Warnings\n\n");
        for w in &result.output.warnings {
            let _ = writeln!(md, "- {w}");
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rsilab_core::domain::{Direction, Signal};

    #[test]
    fn actions_csv_has_header_and_rows() {
        let actions = vec![
            Action {
                bar_index: 1,
                date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                price: 11.0,
                signal: Signal::Buy,
            },
            Action {
                bar_index: 3,
                date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                price: 9.0,
                signal: Signal::Sell,
            },
        ];
        let csv = export_actions_csv(&actions).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,price,action");
        assert_eq!(lines[1], "2024-01-03,11.000000,buy");
        assert_eq!(lines[2], "2024-01-05,9.000000,sell");
    }

    #[test]
    fn trades_csv_columns() {
        let trade = Trade {
            direction: Direction::Short,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            entry_price: 10.0,
            exit_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            exit_price: 9.0,
            return_pct: 0.1,
            holding_days: 5,
            outcome: Outcome::Win,
            cumulative_return: 0.1,
        };
        let csv = export_trades_csv(&[trade]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].starts_with("direction,entry_date"));
        assert_eq!(
            lines[1],
            "short,2024-01-03,10.000000,2024-01-08,9.000000,0.100000,5,win,0.100000"
        );
    }

    #[test]
    fn empty_tables_still_have_headers() {
        assert_eq!(export_trades_csv(&[]).unwrap().lines().count(), 1);
        assert_eq!(export_equity_csv(&[]).unwrap().lines().count(), 1);
        assert_eq!(export_yearly_csv(&[]).unwrap().lines().count(), 1);
        assert_eq!(export_indicators_csv(&[], &[]).unwrap().lines().count(), 1);
    }

    #[test]
    fn outcome_table_rounds_to_four_places() {
        let mut summary = SummaryMetrics::default();
        summary.by_outcome.insert(
            Outcome::Loss,
            rsilab_core::engine::OutcomeStats {
                count: 1,
                mean_return: -0.181818,
                total_days: 2,
                mean_days: 2.0,
            },
        );
        let table = outcome_table(&summary);
        assert!(table.contains("| loss | 1 | -0.1818 | 2 | 2.0000 |"));
    }
}
