//! Daily signal classification and trading direction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BacktestError;

/// Close-of-day classification produced by the threshold rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Signal {
    #[default]
    None,
    Buy,
    Sell,
}

impl Signal {
    pub fn is_none(&self) -> bool {
        matches!(self, Signal::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::None => "none",
            Signal::Buy => "buy",
            Signal::Sell => "sell",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the market the strategy trades.
///
/// Long opens on Buy and closes on Sell; short is the mirror image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Direction {
    #[default]
    Long,
    Short,
}

impl Direction {
    /// Signal that opens a position in this direction.
    pub fn entry_signal(self) -> Signal {
        match self {
            Direction::Long => Signal::Buy,
            Direction::Short => Signal::Sell,
        }
    }

    /// Signal that closes a position in this direction.
    pub fn exit_signal(self) -> Signal {
        match self {
            Direction::Long => Signal::Sell,
            Direction::Short => Signal::Buy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = BacktestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(Direction::Long),
            "short" => Ok(Direction::Short),
            _ => Err(BacktestError::InvalidDirection {
                received: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = BacktestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Direction> for String {
    fn from(d: Direction) -> Self {
        d.as_str().to_string()
    }
}
