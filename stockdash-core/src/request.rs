//! Validated dashboard requests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::data::FetchKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("ticker must not be empty")]
    EmptyTicker,

    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// What to do when the start date falls after the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvertedRangePolicy {
    /// Exchange the two dates and carry on.
    #[default]
    Swap,
    /// Refuse the request.
    Reject,
    /// Forward the dates unchanged; providers return an empty series.
    PassThrough,
}

/// Ticker and date range for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardRequest {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DashboardRequest {
    /// Trim and upper-case the ticker, then apply `policy` to the range.
    pub fn new(
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        policy: InvertedRangePolicy,
    ) -> Result<Self, RequestError> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(RequestError::EmptyTicker);
        }

        let (start, end) = if start <= end {
            (start, end)
        } else {
            match policy {
                InvertedRangePolicy::Swap => {
                    warn!(%ticker, %start, %end, "start after end, swapping dates");
                    (end, start)
                }
                InvertedRangePolicy::Reject => {
                    return Err(RequestError::InvertedRange { start, end })
                }
                InvertedRangePolicy::PassThrough => (start, end),
            }
        };

        Ok(Self { ticker, start, end })
    }

    pub fn key(&self) -> FetchKey {
        FetchKey::new(&self.ticker, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn normalizes_ticker() {
        let req = DashboardRequest::new("  aapl ", d(2020, 1, 1), d(2021, 1, 1), Default::default())
            .unwrap();
        assert_eq!(req.ticker, "AAPL");
        assert_eq!(req.key(), FetchKey::new("AAPL", d(2020, 1, 1), d(2021, 1, 1)));
    }

    #[test]
    fn blank_ticker_rejected() {
        assert_eq!(
            DashboardRequest::new("   ", d(2020, 1, 1), d(2021, 1, 1), Default::default()),
            Err(RequestError::EmptyTicker)
        );
    }

    #[test]
    fn inverted_range_policies() {
        let (late, early) = (d(2024, 6, 1), d(2024, 1, 1));

        let swapped = DashboardRequest::new("MSFT", late, early, InvertedRangePolicy::Swap).unwrap();
        assert_eq!((swapped.start, swapped.end), (early, late));

        assert_eq!(
            DashboardRequest::new("MSFT", late, early, InvertedRangePolicy::Reject),
            Err(RequestError::InvertedRange {
                start: late,
                end: early
            })
        );

        let passed =
            DashboardRequest::new("MSFT", late, early, InvertedRangePolicy::PassThrough).unwrap();
        assert_eq!((passed.start, passed.end), (late, early));
    }

    #[test]
    fn same_day_range_is_valid() {
        let day = d(2024, 3, 15);
        let req = DashboardRequest::new("SPY", day, day, InvertedRangePolicy::Reject).unwrap();
        assert_eq!((req.start, req.end), (day, day));
    }
}
