//! Daily price bars.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw daily OHLCV row as supplied by a data source, before derived columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl RawBar {
    /// True when any OHLC field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite())
    }
}

/// Daily bar for a single instrument.
///
/// `volume_mln` is the traded value in millions (`volume * close / 1e6`).
/// `pct_change` is the close-to-close change from the previous bar and is
/// `None` on the first bar of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub volume_mln: f64,
    pub pct_change: Option<f64>,
}

impl PriceBar {
    /// Build a bar series from raw rows, deriving `volume_mln` and `pct_change`.
    ///
    /// Rows are taken in the order given; ordering is validated by the loader.
    pub fn series_from_raw(raw: &[RawBar]) -> Vec<PriceBar> {
        let mut prev_close: Option<f64> = None;
        raw.iter()
            .map(|r| {
                let pct_change = prev_close.map(|p| r.close / p - 1.0);
                prev_close = Some(r.close);
                PriceBar {
                    date: r.date,
                    open: r.open,
                    high: r.high,
                    low: r.low,
                    close: r.close,
                    volume: r.volume,
                    volume_mln: r.volume * r.close / 1e6,
                    pct_change,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(day: u32, close: f64) -> RawBar {
        RawBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 2_000_000.0,
        }
    }

    #[test]
    fn derived_columns() {
        let bars = PriceBar::series_from_raw(&[raw(2, 100.0), raw(3, 110.0), raw(4, 99.0)]);
        assert_eq!(bars.len(), 3);
        assert!(bars[0].pct_change.is_none());
        assert!((bars[1].pct_change.unwrap() - 0.10).abs() < 1e-12);
        assert!((bars[2].pct_change.unwrap() - (99.0 / 110.0 - 1.0)).abs() < 1e-12);
        // 2M shares at 100 = 200M traded
        assert!((bars[0].volume_mln - 200.0).abs() < 1e-9);
    }

    #[test]
    fn empty_series() {
        assert!(PriceBar::series_from_raw(&[]).is_empty());
    }

    #[test]
    fn detects_void() {
        let mut bar = raw(2, 100.0);
        assert!(!bar.is_void());
        bar.close = f64::NAN;
        assert!(bar.is_void());
        bar.close = 100.0;
        bar.high = f64::INFINITY;
        assert!(bar.is_void());
        // volume is not a price
        bar.high = 101.0;
        bar.volume = f64::NAN;
        assert!(!bar.is_void());
    }
}
