//! Price loading for the runner.
//!
//! Resolves one symbol's bars with this fallback policy:
//! 1. If a price CSV is given and exists → read it
//! 2. Otherwise, if `synthetic` is set → generate a synthetic random walk (tagged)
//! 3. Otherwise → fail with a clear error
//!
//! Rows are filtered to `[start, end]` before derived columns are computed,
//! so the first kept bar has no `pct_change`.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use thiserror::Error;

use rsilab_core::domain::{DatasetHash, PriceBar, RawBar};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read price file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed price CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("dates must be strictly increasing: {previous} is followed by {found}")]
    UnorderedDates { previous: NaiveDate, found: NaiveDate },

    #[error("no price file for '{symbol}' (pass --prices, or --synthetic for synthetic data)")]
    NoPriceSource { symbol: String },
}

/// Options controlling how bars are loaded.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Inclusive lower bound. `None` keeps everything.
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound. `None` keeps everything.
    pub end: Option<NaiveDate>,
    /// Generate synthetic bars when no price file is available.
    pub synthetic: bool,
}

/// Loaded bars plus provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub bars: Vec<PriceBar>,
    /// BLAKE3 over every loaded bar.
    pub dataset_hash: DatasetHash,
    pub has_synthetic: bool,
}

/// One CSV row. Accepts lower-case and Yahoo-style capitalized headers;
/// extra columns such as `Adj Close` are ignored. Unparseable numbers
/// (Yahoo writes `null` on missing days) become `None` and the row is skipped,
/// as is a row whose prices parse but are not finite (`NaN`, `inf`).
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Open", deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(alias = "High", deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(alias = "Low", deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(alias = "Close", deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(alias = "Volume", deserialize_with = "csv::invalid_option")]
    volume: Option<f64>,
}

impl CsvRow {
    fn into_raw(self) -> Option<RawBar> {
        Some(RawBar {
            date: self.date,
            open: self.open?,
            high: self.high?,
            low: self.low?,
            close: self.close?,
            volume: self.volume?,
        })
    }
}

/// Parse price rows from any CSV reader and check date order.
pub fn read_price_csv<R: io::Read>(reader: R) -> Result<Vec<RawBar>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    let mut skipped = 0usize;
    for record in rdr.deserialize::<CsvRow>() {
        match record?.into_raw() {
            Some(bar) if !bar.is_void() => bars.push(bar),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "skipped price rows with missing or non-finite values");
    }

    check_ordered(&bars)?;
    Ok(bars)
}

/// Read a price CSV from disk.
pub fn load_price_csv(path: &Path) -> Result<Vec<RawBar>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_price_csv(io::BufReader::new(file))
}

/// Dates must be strictly increasing.
pub fn check_ordered(bars: &[RawBar]) -> Result<(), LoadError> {
    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(LoadError::UnorderedDates {
                previous: pair[0].date,
                found: pair[1].date,
            });
        }
    }
    Ok(())
}

/// Keep rows inside the inclusive date range.
pub fn filter_range(bars: Vec<RawBar>, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Vec<RawBar> {
    bars.into_iter()
        .filter(|b| start.map_or(true, |s| b.date >= s))
        .filter(|b| end.map_or(true, |e| b.date <= e))
        .collect()
}

/// Load one symbol's bars.
pub fn load_bars(
    symbol: &str,
    prices: Option<&Path>,
    opts: &LoadOptions,
) -> Result<LoadedData, LoadError> {
    let mut has_synthetic = false;

    let raw = match prices {
        Some(path) if path.exists() || !opts.synthetic => {
            tracing::debug!(path = %path.display(), "reading price file");
            load_price_csv(path)?
        }
        _ if opts.synthetic => {
            tracing::warn!(symbol, "generating synthetic data; results will be tagged as synthetic");
            has_synthetic = true;
            let end = opts.end.unwrap_or_else(|| chrono::Local::now().date_naive());
            let start = opts.start.unwrap_or(end - chrono::Duration::days(365 * 5));
            generate_synthetic_bars(symbol, start, end)
        }
        _ => {
            return Err(LoadError::NoPriceSource {
                symbol: symbol.to_string(),
            })
        }
    };

    let raw = filter_range(raw, opts.start, opts.end);
    let bars = PriceBar::series_from_raw(&raw);
    let dataset_hash = DatasetHash::from_bars(&bars);
    tracing::debug!(symbol, bars = bars.len(), %dataset_hash, "bars loaded");

    Ok(LoadedData {
        bars,
        dataset_hash,
        has_synthetic,
    })
}

/// Generate synthetic bars for testing/development.
///
/// A random walk from 100.0 on weekdays only, seeded from the symbol so the
/// same symbol and range always give the same bars.
pub fn generate_synthetic_bars(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<RawBar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64) as f64;

        bars.push(RawBar {
            date: current,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}
