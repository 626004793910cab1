//! Bar feeds for the CLI: CSV files and seeded synthetic random walks.
//!
//! CSV files need a header with `time,open,high,low,close` (extra columns are
//! ignored). The instrument symbol is the file stem. Times are only carried
//! through for display; bars are replayed in file order.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use paperlab_core::Candle;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading a bar feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: cannot parse time '{value}'")]
    Time { row: usize, value: String },

    #[error("row {row}: inconsistent OHLC {candle:?}")]
    InsaneCandle { row: usize, candle: Candle },

    #[error("{0} contains no bars")]
    Empty(String),
}

/// One bar with its display timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedCandle {
    pub time: NaiveDateTime,
    pub candle: Candle,
}

/// All bars of one instrument, in replay order.
#[derive(Debug, Clone, PartialEq)]
pub struct Feed {
    pub symbol: String,
    pub bars: Vec<TimedCandle>,
}

impl Feed {
    pub fn time(&self, index: usize) -> Option<NaiveDateTime> {
        self.bars.get(index).map(|b| b.time)
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    time: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

fn parse_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(value, format) {
            return Some(t);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse bars from any CSV reader.
pub fn read_candles<R: std::io::Read>(reader: R) -> Result<Vec<TimedCandle>, FeedError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars = Vec::new();
    for (i, record) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = record?;
        // 1-based, counting the header
        let line = i + 2;
        let time = parse_time(&row.time).ok_or_else(|| FeedError::Time {
            row: line,
            value: row.time.clone(),
        })?;
        let candle = Candle::new(row.open, row.high, row.low, row.close);
        if !candle.is_sane() {
            return Err(FeedError::InsaneCandle { row: line, candle });
        }
        bars.push(TimedCandle { time, candle });
    }
    Ok(bars)
}

/// Load a CSV file; the symbol is the file stem.
pub fn load_csv(path: &Path) -> Result<Feed, FeedError> {
    let file = std::fs::File::open(path).map_err(|source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bars = read_candles(file)?;
    let symbol = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "UNKNOWN".to_string());
    if bars.is_empty() {
        return Err(FeedError::Empty(path.display().to_string()));
    }
    Ok(Feed { symbol, bars })
}

/// Seeded random walk of `bars` one-minute candles.
///
/// The RNG seed mixes the symbol and `seed`, so different symbols get
/// different paths from the same seed and reruns are reproducible.
pub fn synthetic(symbol: &str, bars: usize, seed: u64, start: NaiveDateTime) -> Feed {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut hasher = blake3::Hasher::new();
    hasher.update(symbol.as_bytes());
    hasher.update(&seed.to_le_bytes());
    let mut rng = StdRng::from_seed(*hasher.finalize().as_bytes());

    let mut price = 100.0_f64;
    let bars = (0..bars)
        .map(|i| {
            let ret: f64 = rng.gen_range(-0.004..0.004);
            let open = price;
            let close = price * (1.0 + ret);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.002));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.002));
            price = close;
            TimedCandle {
                time: start + Duration::minutes(i as i64),
                candle: Candle::new(open, high, low, close),
            }
        })
        .collect();

    Feed {
        symbol: symbol.to_string(),
        bars,
    }
}
