//! RsiLab Core — moving-average crossover + RSI backtest pipeline.
//!
//! This crate contains the computational core, with no I/O:
//! - Domain types (price bars, signals, actions, trades, table rows)
//! - Indicators (SMA, adjusted EWM, crossover %, RSI)
//! - Pipeline stages: signal rules, action compression, trade pairing,
//!   summary metrics, equity curve replay
//! - Strategy parameters and run fingerprints

pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod params;

pub use engine::{run_pipeline, BacktestOutput, SummaryMetrics};
pub use error::{BacktestError, BacktestWarning};
pub use params::StrategyParams;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: pipeline types can move across threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceBar>();
        require_sync::<domain::PriceBar>();
        require_send::<domain::Trade>();
        require_sync::<domain::Trade>();
        require_send::<StrategyParams>();
        require_sync::<StrategyParams>();
        require_send::<BacktestOutput>();
        require_sync::<BacktestOutput>();
        require_send::<BacktestError>();
        require_sync::<BacktestError>();
    }
}
