//! Equity curve replay — day-by-day strategy returns from daily signals.
//!
//! Two-state machine, single forward scan. On day i the state transitions on
//! the signal of day i-1 (known at the previous close), then the day's return
//! is credited if the state is `InPosition`:
//!
//! | state      | prior-day signal | next state |
//! |------------|------------------|------------|
//! | Flat       | entry            | InPosition |
//! | InPosition | exit             | Flat       |
//! | any        | other            | unchanged  |
//!
//! Day 0 has no prior signal and always returns 0.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Direction, EquityCurveRow, Signal, SignalRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionState {
    Flat,
    InPosition,
}

impl PositionState {
    fn next(self, prior: Signal, direction: Direction) -> Self {
        match self {
            PositionState::Flat if prior == direction.entry_signal() => PositionState::InPosition,
            PositionState::InPosition if prior == direction.exit_signal() => PositionState::Flat,
            state => state,
        }
    }
}

/// Replayed curve plus the date of a still-open position, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    pub rows: Vec<EquityCurveRow>,
    pub open_at_end: Option<NaiveDate>,
}

/// Replay `rows` and compute one strategy return per day.
///
/// Long credits the day's percent change while in position; short credits
/// its negation. If the last day is held and its own signal does not close
/// the position, `open_at_end` carries that day's date.
pub fn replay_equity_curve(rows: &[SignalRow], direction: Direction) -> Replay {
    let mut out = Vec::with_capacity(rows.len());
    let mut state = PositionState::Flat;

    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            state = state.next(rows[i - 1].signal, direction);
        }
        let strategy_return = match state {
            PositionState::Flat => 0.0,
            PositionState::InPosition => {
                let change = row.bar.pct_change.unwrap_or(0.0);
                match direction {
                    Direction::Long => change,
                    Direction::Short => -change,
                }
            }
        };
        out.push(EquityCurveRow {
            row: row.clone(),
            strategy_return,
        });
    }

    let open_at_end = rows.last().and_then(|last| {
        let held = state == PositionState::InPosition;
        (held && last.signal != direction.exit_signal()).then_some(last.bar.date)
    });
    if let Some(date) = open_at_end {
        tracing::warn!(%date, "position left open at end of data");
    }

    Replay {
        rows: out,
        open_at_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceBar;
    use crate::domain::Signal::{Buy as B, None as N, Sell as S};

    fn rows(signals: &[Signal], changes: &[f64]) -> Vec<SignalRow> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        signals
            .iter()
            .zip(changes)
            .enumerate()
            .map(|(i, (&signal, &change))| SignalRow {
                bar: PriceBar {
                    date: base + chrono::Duration::days(i as i64),
                    open: 100.0,
                    high: 101.0,
                    low: 99.0,
                    close: 100.0,
                    volume: 1000.0,
                    volume_mln: 0.1,
                    pct_change: Some(change),
                },
                crossover: 0.0,
                rsi: 50.0,
                signal,
            })
            .collect()
    }

    fn returns(replay: &Replay) -> Vec<f64> {
        replay.rows.iter().map(|r| r.strategy_return).collect()
    }

    #[test]
    fn entry_day_after_buy_exit_on_sell_day() {
        let r = rows(&[N, B, N, S, N], &[0.0, 0.01, 0.02, -0.01, 0.0]);
        let replay = replay_equity_curve(&r, Direction::Long);
        assert_eq!(returns(&replay), vec![0.0, 0.0, 0.02, -0.01, 0.0]);
        assert!(replay.open_at_end.is_none());
    }

    #[test]
    fn buy_on_first_day_enters_on_second() {
        let r = rows(&[B, N, S], &[0.5, 0.03, 0.04]);
        let replay = replay_equity_curve(&r, Direction::Long);
        assert_eq!(returns(&replay), vec![0.0, 0.03, 0.04]);
    }

    #[test]
    fn repeated_buys_do_not_reenter() {
        let r = rows(&[B, B, B, S, B], &[0.0, 0.01, 0.02, 0.03, 0.04]);
        let replay = replay_equity_curve(&r, Direction::Long);
        assert_eq!(returns(&replay), vec![0.0, 0.01, 0.02, 0.03, 0.0]);
        // last-day Buy never opened a position
        assert!(replay.open_at_end.is_none());
    }

    #[test]
    fn sell_while_flat_is_ignored() {
        let r = rows(&[S, N, S], &[0.0, 0.01, 0.02]);
        let replay = replay_equity_curve(&r, Direction::Long);
        assert!(returns(&replay).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn open_position_at_end_is_flagged_but_kept() {
        let r = rows(&[N, B, N, N], &[0.0, 0.01, 0.02, 0.03]);
        let replay = replay_equity_curve(&r, Direction::Long);
        assert_eq!(returns(&replay), vec![0.0, 0.0, 0.02, 0.03]);
        assert_eq!(replay.open_at_end, Some(r[3].bar.date));
    }

    #[test]
    fn sell_on_last_day_is_not_open() {
        let r = rows(&[B, N, S], &[0.0, 0.01, 0.02]);
        let replay = replay_equity_curve(&r, Direction::Long);
        assert!(replay.open_at_end.is_none());
    }

    #[test]
    fn short_mirrors_long() {
        let r = rows(&[N, S, N, B, N], &[0.0, 0.01, 0.02, -0.01, 0.0]);
        let replay = replay_equity_curve(&r, Direction::Short);
        assert_eq!(returns(&replay), vec![0.0, 0.0, -0.02, 0.01, 0.0]);
    }

    #[test]
    fn empty_and_single_row() {
        assert!(replay_equity_curve(&[], Direction::Long).rows.is_empty());
        let r = rows(&[B], &[0.2]);
        let replay = replay_equity_curve(&r, Direction::Long);
        assert_eq!(returns(&replay), vec![0.0]);
        assert!(replay.open_at_end.is_none());
    }
}
