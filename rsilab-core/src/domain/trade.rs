//! Round-trip trades and their outcome.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::signal::Direction;

/// Win/loss classification of a closed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    /// Strictly positive returns win; zero counts as a loss.
    pub fn from_return(ret: f64) -> Self {
        if ret > 0.0 {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => f.write_str("win"),
            Outcome::Loss => f.write_str("loss"),
        }
    }
}

/// A completed round-trip trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub direction: Direction,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    /// Fractional return of this trade alone.
    pub return_pct: f64,
    /// Calendar days between entry and exit.
    pub holding_days: i64,
    pub outcome: Outcome,
    /// Compounded return of all trades up to and including this one.
    pub cumulative_return: f64,
}
