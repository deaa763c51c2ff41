//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2/(period+1).
//! Seed: SMA of the first `period` defined values of the source.
//! Lookback: period - 1.

use crate::domain::{Bar, Column, Series};
use crate::indicators::wilder::first_full_window;
use crate::indicators::{Indicator, Source};

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    source: Source,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self::of(Source::Close, period)
    }

    /// EMA of the OHLC4 typical price.
    pub fn ohlc4(period: usize) -> Self {
        Self::of(Source::Ohlc4, period)
    }

    pub fn of(source: Source, period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            source,
            name: source.column_name("EMA", period),
        }
    }
}

impl Indicator for Ema {
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
        let values = ema_of_series(&self.source.extract(bars), self.period);
        vec![Column::new(self.name.clone(), values)]
    }
}

/// EMA over an arbitrary series.
///
/// Leading `None`s are skipped, so this also smooths derived series that have
/// their own warm-up (the MACD signal line is an EMA of the MACD line).
/// A gap after the seed leaves that row undefined; smoothing resumes from the
/// last value at the next defined input.
pub fn ema_of_series(values: &[Option<f64>], period: usize) -> Series {
    let n = values.len();
    let mut result = vec![None; n];

    let Some(seed_start) = first_full_window(values, period) else {
        return result;
    };
    let seed_end = seed_start + period;

    let seed = values[seed_start..seed_end].iter().flatten().sum::<f64>() / period as f64;
    result[seed_end - 1] = Some(seed);

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut prev = seed;
    for i in seed_end..n {
        let Some(v) = values[i] else {
            continue;
        };
        prev = alpha * v + (1.0 - alpha) * prev;
        result[i] = Some(prev);
    }
    result
}
