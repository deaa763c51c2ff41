//! Bar: one trading day of OHLCV data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar.
///
/// Missing provider values are carried as non-finite floats (NaN). Indicators
/// treat a non-finite input as "no value" rather than propagating NaN into
/// their outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

impl Bar {
    /// Returns true if any OHLC field is missing.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }

    /// Typical price used by the OHLC4 indicator.
    pub fn ohlc4(&self) -> Option<f64> {
        if self.is_void() {
            None
        } else {
            Some((self.open + self.high + self.low + self.close) / 4.0)
        }
    }
}

/// Returns the first date that breaks the strictly-increasing invariant.
pub fn first_out_of_order(bars: &[Bar]) -> Option<NaiveDate> {
    bars.windows(2)
        .find(|pair| pair[0].date >= pair[1].date)
        .map(|pair| pair[1].date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            adj_close: 103.0,
            volume: 50_000,
        }
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar();
        bar.open = f64::NAN;
        assert!(bar.is_void());
        assert_eq!(bar.ohlc4(), None);
    }

    #[test]
    fn ohlc4_is_mean_of_four_prices() {
        assert_eq!(sample_bar().ohlc4(), Some((100.0 + 105.0 + 98.0 + 103.0) / 4.0));
    }

    #[test]
    fn out_of_order_dates_are_reported() {
        let a = sample_bar();
        let mut b = sample_bar();
        b.date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(first_out_of_order(&[a.clone(), b.clone()]), None);
        assert_eq!(first_out_of_order(&[b, a.clone()]), Some(a.date));
    }
}
