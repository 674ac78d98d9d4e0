//! RsiLab Runner — backtest orchestration on top of `rsilab-core`.
//!
//! This crate provides:
//! - TOML configuration with ticker normalization
//! - Price loading from CSV with synthetic fallback
//! - Single-backtest runner with run fingerprints
//! - Calendar-year return analytics
//! - JSON / CSV / Markdown artifact export

pub mod analytics;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;

pub use analytics::{yearly_stats, ReturnStats, YearlyStats};
pub use config::{normalize_symbol, BacktestConfig, ConfigError};
pub use data_loader::{load_bars, LoadError, LoadOptions, LoadedData};
pub use export::{generate_report, load_artifacts, save_artifacts};
pub use runner::{run_backtest_from_bars, run_single_backtest, BacktestResult, RunError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn backtest_result_is_send_sync() {
        assert_send::<BacktestResult>();
        assert_sync::<BacktestResult>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<BacktestConfig>();
        assert_sync::<BacktestConfig>();
        assert_send::<LoadOptions>();
        assert_sync::<LoadOptions>();
    }

    #[test]
    fn yearly_stats_is_send_sync() {
        assert_send::<YearlyStats>();
        assert_sync::<YearlyStats>();
    }
}
