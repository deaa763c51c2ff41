//! Simple Moving Average (SMA).
//!
//! Rolling mean of the last `period` values of a source.
//! Lookback: period - 1.
//! A window that contains a gap is undefined; the average resumes once the
//! gap has rolled out of the window.

use crate::domain::{Bar, Column, Series};
use crate::indicators::{Indicator, Source};

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    source: Source,
    name: String,
}

impl Sma {
    /// SMA of close prices.
    pub fn new(period: usize) -> Self {
        Self::of(Source::Close, period)
    }

    /// SMA of traded volume.
    pub fn volume(period: usize) -> Self {
        Self::of(Source::Volume, period)
    }

    pub fn of(source: Source, period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            source,
            name: source.column_name("SMA", period),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn outputs(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Column> {
        let values = sma_of_series(&self.source.extract(bars), self.period);
        vec![Column::new(self.name.clone(), values)]
    }
}

/// Rolling mean over an arbitrary series.
///
/// Keeps a running sum plus a count of gaps inside the window.
pub fn sma_of_series(values: &[Option<f64>], period: usize) -> Series {
    let n = values.len();
    let mut result = vec![None; n];
    if period == 0 || n < period {
        return result;
    }

    let mut sum = 0.0;
    let mut gaps = 0usize;
    for i in 0..n {
        match values[i] {
            Some(v) => sum += v,
            None => gaps += 1,
        }
        if i >= period {
            match values[i - period] {
                Some(v) => sum -= v,
                None => gaps -= 1,
            }
        }
        if i + 1 >= period && gaps == 0 {
            result[i] = Some(sum / period as f64);
        }
    }
    result
}
