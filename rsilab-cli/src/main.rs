//! RsiLab CLI — run and inspect crossover + RSI backtests.
//!
//! Commands:
//! - `run` : execute a backtest from a TOML config file and/or flags
//! - `show`: print a saved run from its artifact directory

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rsilab_core::domain::{Direction, Outcome};
use rsilab_runner::runner::run_single_backtest;
use rsilab_runner::{load_artifacts, save_artifacts, BacktestConfig, BacktestResult};

#[derive(Parser)]
#[command(
    name = "rsilab",
    about = "RsiLab CLI — moving-average crossover + RSI backtester"
)]
struct Cli {
    /// Log filter when RSILAB_LOG is unset (e.g. "info", "rsilab_core=debug").
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format: "text" or "json".
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest and save its artifacts.
    Run(RunArgs),
    /// Print the summary of a saved run.
    Show {
        /// Artifact directory written by `run`.
        dir: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Path to a TOML config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticker symbol (normalized: "$spy" → "SPY"). Defaults to SPY.
    #[arg(long)]
    symbol: Option<String>,

    /// Price CSV with date,open,high,low,close,volume columns.
    #[arg(long)]
    prices: Option<PathBuf>,

    /// Start date (YYYY-MM-DD), inclusive.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD), inclusive.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Use synthetic data when no price file is available.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Fast SMA window.
    #[arg(long)]
    fast: Option<usize>,

    /// Slow SMA window.
    #[arg(long)]
    slow: Option<usize>,

    /// RSI window.
    #[arg(long)]
    rsi: Option<usize>,

    /// Minimum RSI for a Buy signal.
    #[arg(long)]
    buy_rsi: Option<f64>,

    /// Maximum RSI for a Sell signal.
    #[arg(long)]
    sell_rsi: Option<f64>,

    /// Minimum crossover % for a Buy signal.
    #[arg(long, allow_hyphen_values = true)]
    buy_crossover: Option<f64>,

    /// Maximum crossover % for a Sell signal.
    #[arg(long, allow_hyphen_values = true)]
    sell_crossover: Option<f64>,

    /// "long" or "short".
    #[arg(long)]
    direction: Option<Direction>,

    /// Output directory for artifacts.
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, &cli.log_format)?;

    match cli.command {
        Commands::Run(args) => run_backtest_cmd(args),
        Commands::Show { dir } => {
            let result = load_artifacts(&dir)?;
            print_summary(&result);
            print_trades(&result);
            Ok(())
        }
    }
}

/// Install the global subscriber. `RSILAB_LOG` takes precedence over `--log-level`.
fn init_tracing(log_level: &str, log_format: &str) -> Result<()> {
    let filter = std::env::var("RSILAB_LOG").unwrap_or_else(|_| log_level.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&filter)
        .with_context(|| format!("invalid log filter: {filter}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    if log_format.trim().eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn run_backtest_cmd(args: RunArgs) -> Result<()> {
    let config = build_config(&args)?;
    let opts = config.load_options(args.synthetic);

    let result = run_single_backtest(&config, &opts)
        .with_context(|| format!("backtest failed for {}", config.backtest.symbol))?;

    print_summary(&result);

    let run_dir = save_artifacts(&result, &args.output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

/// Config file (or defaults for the symbol), then flag overrides.
fn build_config(args: &RunArgs) -> Result<BacktestConfig> {
    let mut config = match &args.config {
        Some(path) => BacktestConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => BacktestConfig::for_symbol(args.symbol.as_deref().unwrap_or("SPY")),
    };

    let bt = &mut config.backtest;
    if let Some(symbol) = &args.symbol {
        bt.symbol = rsilab_runner::normalize_symbol(symbol);
    }
    if args.prices.is_some() {
        bt.prices = args.prices.clone();
    }
    if args.start.is_some() {
        bt.start_date = args.start;
    }
    if args.end.is_some() {
        bt.end_date = args.end;
    }

    let s = &mut config.strategy;
    if let Some(v) = args.fast {
        s.fast = v;
    }
    if let Some(v) = args.slow {
        s.slow = v;
    }
    if let Some(v) = args.rsi {
        s.rsi_period = v;
    }
    if let Some(v) = args.buy_rsi {
        s.buy_rsi_min = v;
    }
    if let Some(v) = args.sell_rsi {
        s.sell_rsi_min = v;
    }
    if let Some(v) = args.buy_crossover {
        s.buy_crossover_min = v;
    }
    if let Some(v) = args.sell_crossover {
        s.sell_crossover_max = v;
    }
    if let Some(d) = args.direction {
        s.direction = d;
    }

    config.validate()?;
    tracing::debug!(symbol = %config.backtest.symbol, params = ?config.strategy, "config resolved");
    Ok(config)
}

fn print_summary(result: &BacktestResult) {
    let s = &result.output.summary;
    let p = &result.params;

    println!();
    println!("=== Backtest Result ===");
    println!("Symbol:         {}", result.symbol);
    println!(
        "Period:         {} to {}",
        result.start_date, result.end_date
    );
    println!(
        "Bars:           {} ({} warmup)",
        result.bar_count, result.warmup_bars
    );
    println!(
        "Strategy:       {} SMA({})/SMA({}) RSI({})",
        p.direction, p.fast, p.slow, p.rsi_period
    );
    println!("Signal days:    {}", result.signal_count);
    println!("Trades:         {}", s.trade_count());
    println!();

    if s.trade_count() > 0 {
        println!(
            "{:<8} {:>7} {:>12} {:>11} {:>10}",
            "Outcome", "Trades", "Mean Return", "Total Days", "Mean Days"
        );
        println!("{}", "-".repeat(52));
        for outcome in [Outcome::Win, Outcome::Loss] {
            if let Some(st) = s.stats(outcome) {
                println!(
                    "{:<8} {:>7} {:>12.4} {:>11} {:>10.4}",
                    outcome.to_string(),
                    st.count,
                    st.mean_return,
                    st.total_days,
                    st.mean_days
                );
            }
        }
        println!();
    }

    println!("--- Performance ---");
    println!("Total Return:   {:.4}", s.total_return);
    println!("Days in Market: {}", s.days_in_market);
    println!("TEA:            {:.4}", s.annualized_return);
    println!("Win Rate:       {:.4}", s.win_rate());

    if result.has_synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    for warn in &result.output.warnings {
        println!("WARNING: {warn}");
    }
    println!();
}

fn print_trades(result: &BacktestResult) {
    let trades = &result.output.trades;
    if trades.is_empty() {
        return;
    }
    println!(
        "{:<12} {:>10} {:<12} {:>10} {:>9} {:>6} {:>11}",
        "Entry", "Price", "Exit", "Price", "Return", "Days", "Cumulative"
    );
    println!("{}", "-".repeat(76));
    for t in trades {
        println!(
            "{:<12} {:>10.4} {:<12} {:>10.4} {:>9.4} {:>6} {:>11.4}",
            t.entry_date.to_string(),
            t.entry_price,
            t.exit_date.to_string(),
            t.exit_price,
            t.return_pct,
            t.holding_days,
            t.cumulative_return
        );
    }
    println!();
}
