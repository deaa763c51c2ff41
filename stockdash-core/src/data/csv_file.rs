//! CSV file provider.
//!
//! Reads `<dir>/<TICKER>.csv` with a `Date,Open,High,Low,Close,Volume` header
//! (column order free, extra columns such as `Adj Close` allowed) and an
//! optional `<dir>/<TICKER>.profile.json` holding the company profile.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::provider::{DataError, DataProvider, DataSource, MarketSnapshot};
use crate::domain::{Bar, CompanyProfile};

pub struct CsvProvider {
    dir: PathBuf,
}

struct ColumnIndex {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    adj_close: Option<usize>,
    volume: usize,
}

impl ColumnIndex {
    fn from_headers(ticker: &str, headers: &csv::StringRecord) -> Result<Self, DataError> {
        let lower: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |name: &str| lower.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| DataError::Invalid {
                symbol: ticker.to_string(),
                reason: format!("missing column {name}"),
            })
        };
        Ok(Self {
            date: require("date")?,
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            adj_close: find("adj close").or_else(|| find("adj_close")),
            volume: require("volume")?,
        })
    }
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn price_path(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }

    fn profile_path(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.profile.json"))
    }

    /// Parse bars from CSV, keeping dates within `[start, end]`.
    ///
    /// Empty or unparsable price cells become missing values; an unparsable
    /// date is an error.
    pub fn read_bars<R: std::io::Read>(
        ticker: &str,
        reader: R,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let idx = ColumnIndex::from_headers(ticker, rdr.headers()?)?;

        let mut bars = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let cell = |i: usize| record.get(i).map(str::trim).unwrap_or("");
            let price = |i: usize| cell(i).parse::<f64>().unwrap_or(f64::NAN);

            let date = NaiveDate::parse_from_str(cell(idx.date), "%Y-%m-%d").map_err(|e| {
                DataError::Invalid {
                    symbol: ticker.to_string(),
                    reason: format!("bad date {:?}: {e}", cell(idx.date)),
                }
            })?;
            if date < start || date > end {
                continue;
            }

            let close = price(idx.close);
            bars.push(Bar {
                date,
                open: price(idx.open),
                high: price(idx.high),
                low: price(idx.low),
                close,
                adj_close: idx.adj_close.map(&price).unwrap_or(close),
                volume: cell(idx.volume)
                    .parse::<f64>()
                    .map(|v| v.max(0.0) as u64)
                    .unwrap_or(0),
            });
        }
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn read_profile(&self, ticker: &str) -> Option<CompanyProfile> {
        let path = self.profile_path(ticker);
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(ticker, path = %path.display(), error = %e, "ignoring unreadable profile");
                None
            }
        }
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<MarketSnapshot, DataError> {
        let path = self.price_path(ticker);
        let bars = match std::fs::File::open(&path) {
            Ok(file) => Self::read_bars(ticker, file, start, end)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(ticker, path = %path.display(), "no CSV file for ticker");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(MarketSnapshot {
            bars,
            profile: self.read_profile(ticker),
            source: DataSource::CsvImport,
        })
    }

    fn is_available(&self) -> bool {
        self.dir.is_dir()
    }
}
