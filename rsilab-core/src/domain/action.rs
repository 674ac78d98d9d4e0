//! Point-in-time entry and exit triggers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::signal::Signal;

/// A day on which the signal changed, priced at that day's close.
///
/// `signal` is always `Buy` or `Sell`; `bar_index` points into the
/// warmed-up signal table the action was drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub bar_index: usize,
    pub date: NaiveDate,
    pub price: f64,
    pub signal: Signal,
}
