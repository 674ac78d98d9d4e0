//! Converts alternating actions into round-trip trades.
//!
//! Pure function: actions at even indices are entries, odd indices exits.

use crate::domain::{Action, Direction, Outcome, Signal, Trade};
use crate::error::BacktestError;

/// Pair entry/exit actions into trades.
///
/// Long return = exit / entry - 1. Short return = 1 - exit / entry, where the
/// entry is the Sell action and the exit the Buy action.
///
/// `transaction_cost` is reserved: it is accepted so the parameter travels
/// with the run, but no cost is deducted from returns.
///
/// # Errors
/// - `UnpairedAction` if `actions` has odd length.
/// - `MisorderedAction` if an entry or exit carries the wrong signal for
///   `direction`.
pub fn pair_trades(
    actions: &[Action],
    direction: Direction,
    transaction_cost: f64,
) -> Result<Vec<Trade>, BacktestError> {
    if actions.len() % 2 != 0 {
        return Err(BacktestError::UnpairedAction { len: actions.len() });
    }
    if transaction_cost != 0.0 {
        tracing::debug!(transaction_cost, "transaction cost is reserved and not applied");
    }

    let mut trades = Vec::with_capacity(actions.len() / 2);
    let mut growth = 1.0;

    for (pair_idx, pair) in actions.chunks_exact(2).enumerate() {
        let (entry, exit) = (&pair[0], &pair[1]);
        check_signal(entry, 2 * pair_idx, direction.entry_signal())?;
        check_signal(exit, 2 * pair_idx + 1, direction.exit_signal())?;

        let return_pct = match direction {
            Direction::Long => exit.price / entry.price - 1.0,
            Direction::Short => 1.0 - exit.price / entry.price,
        };
        growth *= 1.0 + return_pct;

        trades.push(Trade {
            direction,
            entry_date: entry.date,
            entry_price: entry.price,
            exit_date: exit.date,
            exit_price: exit.price,
            return_pct,
            holding_days: (exit.date - entry.date).num_days(),
            outcome: Outcome::from_return(return_pct),
            cumulative_return: growth - 1.0,
        });
    }

    Ok(trades)
}

fn check_signal(
    action: &Action,
    index: usize,
    expected: Signal,
) -> Result<(), BacktestError> {
    if action.signal == expected {
        Ok(())
    } else {
        Err(BacktestError::MisorderedAction {
            index,
            expected,
            found: action.signal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn action(day: u32, price: f64, signal: Signal) -> Action {
        Action {
            bar_index: day as usize,
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            price,
            signal,
        }
    }

    #[test]
    fn empty_actions_give_no_trades() {
        let trades = pair_trades(&[], Direction::Long, 0.0).unwrap();
        assert!(trades.is_empty());
    }

    #[test]
    fn long_trade_fields() {
        let actions = [action(1, 100.0, Signal::Buy), action(8, 110.0, Signal::Sell)];
        let trades = pair_trades(&actions, Direction::Long, 0.0).unwrap();
        assert_eq!(trades.len(), 1);
        let t = &trades[0];
        assert!((t.return_pct - 0.10).abs() < 1e-12);
        assert_eq!(t.holding_days, 7);
        assert_eq!(t.outcome, Outcome::Win);
        assert!((t.cumulative_return - 0.10).abs() < 1e-12);
    }

    #[test]
    fn short_trade_profits_from_decline() {
        let actions = [action(2, 100.0, Signal::Sell), action(5, 80.0, Signal::Buy)];
        let trades = pair_trades(&actions, Direction::Short, 0.0).unwrap();
        assert!((trades[0].return_pct - 0.20).abs() < 1e-12);
        assert_eq!(trades[0].outcome, Outcome::Win);
        assert_eq!(trades[0].holding_days, 3);
    }

    #[test]
    fn cumulative_return_compounds() {
        let actions = [
            action(1, 100.0, Signal::Buy),
            action(2, 110.0, Signal::Sell),
            action(3, 100.0, Signal::Buy),
            action(4, 95.0, Signal::Sell),
        ];
        let trades = pair_trades(&actions, Direction::Long, 0.0).unwrap();
        assert!((trades[1].cumulative_return - (1.10 * 0.95 - 1.0)).abs() < 1e-12);
        assert_eq!(trades[1].outcome, Outcome::Loss);
    }

    #[test]
    fn odd_length_is_unpaired() {
        let actions = [
            action(1, 100.0, Signal::Buy),
            action(2, 110.0, Signal::Sell),
            action(3, 100.0, Signal::Buy),
        ];
        let err = pair_trades(&actions, Direction::Long, 0.0).unwrap_err();
        assert_eq!(err, BacktestError::UnpairedAction { len: 3 });
    }

    #[test]
    fn wrong_orientation_is_rejected() {
        let actions = [action(1, 100.0, Signal::Sell), action(2, 110.0, Signal::Buy)];
        let err = pair_trades(&actions, Direction::Long, 0.0).unwrap_err();
        assert_eq!(
            err,
            BacktestError::MisorderedAction {
                index: 0,
                expected: Signal::Buy,
                found: Signal::Sell,
            }
        );
    }

    #[test]
    fn transaction_cost_is_not_applied() {
        let actions = [action(1, 100.0, Signal::Buy), action(2, 110.0, Signal::Sell)];
        let with_cost = pair_trades(&actions, Direction::Long, 0.05).unwrap();
        let without = pair_trades(&actions, Direction::Long, 0.0).unwrap();
        assert_eq!(with_cost, without);
    }
}
