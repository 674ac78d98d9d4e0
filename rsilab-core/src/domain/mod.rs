//! Domain types for RsiLab

pub mod action;
pub mod bar;
pub mod ids;
pub mod rows;
pub mod signal;
pub mod trade;

pub use action::Action;
pub use bar::{PriceBar, RawBar};
pub use ids::{DatasetHash, ParamsHash, RunId};
pub use rows::{EquityCurveRow, IndicatorRow, SignalRow};
pub use signal::{Direction, Signal};
pub use trade::{Outcome, Trade};
