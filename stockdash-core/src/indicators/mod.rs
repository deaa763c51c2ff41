//! Technical indicators computed over a daily bar series.
//!
//! Every indicator implements [`Indicator`] and emits one or more named
//! [`Column`]s aligned 1:1 with the input bars. Warm-up rows and rows touched
//! by an input gap are `None`; no indicator looks ahead of the current bar.
//!
//! Multi-output indicators (Bollinger, MACD, Donchian, ADX) emit all of their
//! columns from a single pass.

pub mod adx;
pub mod bollinger;
pub mod donchian;
pub mod ema;
pub mod macd;
pub mod ohlc4;
pub mod rsi;
pub mod sma;
pub mod source;
pub mod wilder;

pub use adx::Adx;
pub use bollinger::Bollinger;
pub use donchian::Donchian;
pub use ema::Ema;
pub use macd::Macd;
pub use ohlc4::Ohlc4;
pub use rsi::Rsi;
pub use sma::Sma;
pub use source::Source;

use crate::domain::{Bar, Column};

/// A causal transformation of a bar series into named columns.
pub trait Indicator: Send + Sync {
    /// Short identifier, e.g. `"BBANDS_20_2.0"`.
    fn name(&self) -> &str;

    /// Names of the columns [`compute`](Indicator::compute) emits, in order.
    fn outputs(&self) -> Vec<String>;

    /// Index of the first row at which every output is defined, assuming a
    /// gap-free input.
    fn lookback(&self) -> usize;

    /// Compute all outputs. Each returned column has `bars.len()` rows.
    fn compute(&self, bars: &[Bar]) -> Vec<Column>;
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                adj_close: close,
                volume: 1000,
            }
        })
        .collect()
}

/// Bars from explicit (open, high, low, close) tuples.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            adj_close: close,
            volume: 1000,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Unwrap a defined cell and compare it.
#[cfg(test)]
pub fn assert_cell(actual: Option<f64>, expected: f64, epsilon: f64) {
    match actual {
        Some(v) => assert_approx(v, expected, epsilon),
        None => panic!("expected {expected}, cell is undefined"),
    }
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    fn battery() -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Sma::new(5)),
            Box::new(Ema::new(5)),
            Box::new(Bollinger::new(5, 2.0)),
            Box::new(Rsi::new(5)),
            Box::new(Macd::new(3, 6, 3)),
            Box::new(Ohlc4::new()),
            Box::new(Donchian::new(3, 5)),
            Box::new(Adx::new(4)),
        ]
    }

    #[test]
    fn lookback_matches_first_defined_row() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect();
        let bars = make_bars(&closes);
        for ind in battery() {
            let first = ind
                .compute(&bars)
                .iter()
                .filter_map(Column::first_defined)
                .max()
                .unwrap();
            assert_eq!(first, ind.lookback(), "{}", ind.name());
        }
    }

    #[test]
    fn outputs_match_emitted_columns() {
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        for ind in battery() {
            let names: Vec<String> = ind.compute(&bars).into_iter().map(|c| c.name).collect();
            assert_eq!(names, ind.outputs(), "{}", ind.name());
        }
    }
}
