//! Strategy parameters: one immutable record passed to every stage.

use serde::{Deserialize, Serialize};

use crate::domain::{Direction, ParamsHash};
use crate::error::BacktestError;

/// Complete parameter set of a crossover + RSI backtest.
///
/// Missing fields deserialize to the defaults of [`StrategyParams::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategyParams {
    /// Fast SMA window.
    pub fast: usize,
    /// Slow SMA window.
    pub slow: usize,
    /// RSI smoothing window (`alpha = 1 / rsi_period`).
    pub rsi_period: usize,
    /// Buy when crossover % is at least this...
    pub buy_crossover_min: f64,
    /// ...and RSI is at least this.
    pub buy_rsi_min: f64,
    /// Sell when crossover % is at most this...
    pub sell_crossover_max: f64,
    /// ...and RSI is at most this.
    pub sell_rsi_min: f64,
    pub direction: Direction,
    /// Reserved. Carried through to the trade pairer but never applied.
    pub transaction_cost: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            fast: 20,
            slow: 60,
            rsi_period: 15,
            buy_crossover_min: 0.0,
            buy_rsi_min: 75.0,
            sell_crossover_max: 0.0,
            sell_rsi_min: 35.0,
            direction: Direction::Long,
            transaction_cost: 0.0,
        }
    }
}

impl StrategyParams {
    /// Reject window lengths of zero and non-finite thresholds.
    pub fn validate(&self) -> Result<(), BacktestError> {
        for (name, value) in [
            ("fast", self.fast),
            ("slow", self.slow),
            ("rsi_period", self.rsi_period),
        ] {
            if value == 0 {
                return Err(BacktestError::InvalidParameter {
                    name,
                    reason: "window length must be >= 1".into(),
                });
            }
        }
        for (name, value) in [
            ("buy_crossover_min", self.buy_crossover_min),
            ("buy_rsi_min", self.buy_rsi_min),
            ("sell_crossover_max", self.sell_crossover_max),
            ("sell_rsi_min", self.sell_rsi_min),
            ("transaction_cost", self.transaction_cost),
        ] {
            if !value.is_finite() {
                return Err(BacktestError::InvalidParameter {
                    name,
                    reason: format!("must be finite, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// Number of leading bars without a defined crossover or RSI.
    pub fn warmup_bars(&self) -> usize {
        self.fast.max(self.slow).saturating_sub(1).max(self.rsi_period)
    }

    /// Exact identity of this parameter set.
    ///
    /// serde_json writes struct fields in declaration order, so the
    /// serialization (and therefore the hash) is stable.
    pub fn params_hash(&self) -> ParamsHash {
        let json = serde_json::to_string(self).expect("StrategyParams serialization failed");
        ParamsHash::from_bytes(json.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let params = StrategyParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.warmup_bars(), 59);
    }

    #[test]
    fn zero_window_rejected() {
        let params = StrategyParams {
            slow: 0,
            ..Default::default()
        };
        match params.validate() {
            Err(BacktestError::InvalidParameter { name, .. }) => assert_eq!(name, "slow"),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn nan_threshold_rejected() {
        let params = StrategyParams {
            buy_rsi_min: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn warmup_uses_rsi_when_longer() {
        let params = StrategyParams {
            fast: 2,
            slow: 3,
            rsi_period: 10,
            ..Default::default()
        };
        assert_eq!(params.warmup_bars(), 10);
    }

    #[test]
    fn params_hash_changes_with_values() {
        let a = StrategyParams::default();
        let b = StrategyParams {
            fast: 10,
            ..Default::default()
        };
        assert_eq!(a.params_hash(), a.clone().params_hash());
        assert_ne!(a.params_hash(), b.params_hash());
    }

    #[test]
    fn params_hash_is_over_the_full_serialization() {
        let params = StrategyParams::default();
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"rsi_period\""));
        assert_eq!(params.params_hash(), ParamsHash::from_bytes(json.as_bytes()));
        assert_ne!(params.params_hash(), ParamsHash::from_bytes(b""));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let params: StrategyParams =
            serde_json::from_str(r#"{"fast": 5, "direction": "short"}"#).unwrap();
        assert_eq!(params.fast, 5);
        assert_eq!(params.slow, 60);
        assert_eq!(params.direction, Direction::Short);
    }
}
