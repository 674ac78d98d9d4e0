//! Action compression — turn daily signal levels into alternating triggers.
//!
//! 1. Drop rows without a signal.
//! 2. Keep a row only when its signal differs from the previous kept
//!    candidate (edges, not levels). The result alternates Buy/Sell.
//! 3. Trim for direction: the sequence must open with the direction's entry
//!    signal and close with its exit signal. A leading exit (closing a
//!    position never opened) and a trailing entry (a position never closed)
//!    are discarded.
//!
//! Invariant: the output alternates strictly and has even length.

use crate::domain::{Action, Direction, SignalRow};

/// Compress a signal table into an alternating entry/exit action list.
pub fn compress_actions(rows: &[SignalRow], direction: Direction) -> Vec<Action> {
    trim_for_direction(signal_edges(rows), direction)
}

/// Steps 1 and 2: first occurrence of each run of identical non-None signals.
pub fn signal_edges(rows: &[SignalRow]) -> Vec<Action> {
    let mut actions: Vec<Action> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        if row.signal.is_none() {
            continue;
        }
        if actions.last().is_some_and(|prev| prev.signal == row.signal) {
            continue;
        }
        actions.push(Action {
            bar_index: i,
            date: row.bar.date,
            price: row.bar.close,
            signal: row.signal,
        });
    }
    actions
}

/// Step 3: drop a wrong-way first and last action.
///
/// Applied at every length. Because the input alternates, an output that
/// starts on an entry and ends on an exit is always even.
pub fn trim_for_direction(mut actions: Vec<Action>, direction: Direction) -> Vec<Action> {
    if actions
        .first()
        .is_some_and(|a| a.signal == direction.exit_signal())
    {
        actions.remove(0);
    }
    if actions
        .last()
        .is_some_and(|a| a.signal == direction.entry_signal())
    {
        actions.pop();
    }
    actions
}
