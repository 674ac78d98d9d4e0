//! Backtest pipeline stages.
//!
//! Each stage is a pure function that returns a new table:
//!
//! 1. `precompute`    — bars → indicator rows
//! 2. `warmup`        — drop rows with undefined indicators
//! 3. `signal_rules`  — rows → daily Buy / Sell / None
//! 4. `compress`      — signal levels → alternating actions
//! 5. `trade_pairing` — actions → trades
//! 6. `summary`       — trades → summary metrics
//! 7. `replay`        — signal rows → daily strategy returns

pub mod compress;
pub mod pipeline;
pub mod precompute;
pub mod replay;
pub mod signal_rules;
pub mod summary;
pub mod trade_pairing;
pub mod warmup;

pub use compress::{compress_actions, signal_edges, trim_for_direction};
pub use pipeline::{run_pipeline, BacktestOutput};
pub use precompute::precompute_indicators;
pub use replay::{replay_equity_curve, PositionState, Replay};
pub use signal_rules::{generate_signals, SignalThresholds};
pub use summary::{annualized_return, summarize, OutcomeStats, SummaryMetrics};
pub use trade_pairing::pair_trades;
pub use warmup::drop_warmup;
