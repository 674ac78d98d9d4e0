//! TOML backtest configuration.
//!
//! ```toml
//! [backtest]
//! symbol = "SPY"
//! prices = "data/SPY.csv"
//! start_date = "2000-01-01"
//! end_date = "2024-12-31"
//!
//! [strategy]
//! fast = 20
//! slow = 60
//! direction = "long"
//! ```
//!
//! Every `[strategy]` key is optional and falls back to the
//! `StrategyParams` default.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rsilab_core::{BacktestError, StrategyParams};

use crate::data_loader::LoadOptions;

/// Errors from reading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("invalid strategy: {0}")]
    Strategy(#[from] BacktestError),
}

/// Complete configuration of one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    #[serde(default)]
    pub strategy: StrategyParams,
}

/// `[backtest]` table: what to trade and over which dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BacktestSection {
    pub symbol: String,
    /// Price CSV. When absent the run needs synthetic data.
    #[serde(default)]
    pub prices: Option<PathBuf>,
    /// Inclusive. `None` keeps everything from the first bar.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive. `None` means up to today.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl BacktestConfig {
    /// Config for `symbol` with default strategy parameters.
    pub fn for_symbol(symbol: &str) -> Self {
        Self {
            backtest: BacktestSection {
                symbol: normalize_symbol(symbol),
                prices: None,
                start_date: None,
                end_date: None,
            },
            strategy: StrategyParams::default(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse, normalize the symbol and validate.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let mut config: BacktestConfig = toml::from_str(text)?;
        config.backtest.symbol = normalize_symbol(&config.backtest.symbol);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backtest.symbol.is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".into()));
        }
        if let (Some(start), Some(end)) = (self.backtest.start_date, self.backtest.end_date) {
            if start > end {
                return Err(ConfigError::Invalid(format!(
                    "start_date {start} is after end_date {end}"
                )));
            }
        }
        self.strategy.validate()?;
        Ok(())
    }

    pub fn load_options(&self, synthetic: bool) -> LoadOptions {
        LoadOptions {
            start: self.backtest.start_date,
            end: self.backtest.end_date,
            synthetic,
        }
    }
}

/// Canonical ticker form: upper-cased, `$` removed, then the first
/// whitespace-separated token. `" $spy daily"` and `"$ spy"` become `"SPY"`.
pub fn normalize_symbol(raw: &str) -> String {
    raw.to_uppercase()
        .replace('$', "")
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_string()
}
