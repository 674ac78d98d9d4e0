//! Pipeline errors and non-fatal warnings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::Signal;

/// Configuration or invariant failures. These abort the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BacktestError {
    #[error("invalid direction '{received}': expected 'long' or 'short'")]
    InvalidDirection { received: String },

    #[error("odd-length action sequence ({len} actions) cannot be paired into trades")]
    UnpairedAction { len: usize },

    #[error("action {index} is {found}, expected {expected}")]
    MisorderedAction {
        index: usize,
        expected: Signal,
        found: Signal,
    },

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Conditions worth reporting that do not change the numeric output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BacktestWarning {
    /// Empty price series, or no bar survived the indicator warm-up.
    NoData,
    /// Replay ended while a position opened by a signal was still held.
    OpenPositionAtEnd { date: NaiveDate },
}

impl fmt::Display for BacktestWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BacktestWarning::NoData => {
                f.write_str("no data after indicator warm-up: zero trades")
            }
            BacktestWarning::OpenPositionAtEnd { date } => {
                write!(f, "position left open at end of data ({date})")
            }
        }
    }
}
