//! OHLC4 typical price: (open + high + low + close) / 4.
//!
//! Lookback: 0.

use crate::domain::{Bar, Column};
use crate::indicators::{Indicator, Source};

#[derive(Debug, Clone, Default)]
pub struct Ohlc4;

impl Ohlc4 {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Ohlc4 {
    fn name(&self) -> &str {
        "OHLC4"
    }

    fn outputs(&self) -> Vec<String> {
        vec!["OHLC4".to_string()]
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Column> {
        vec![Column::new("OHLC4", Source::Ohlc4.extract(bars))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_cell, make_ohlc_bars, DEFAULT_EPSILON};

    #[test]
    fn defined_on_every_complete_row() {
        let mut bars = make_ohlc_bars(&[(1.0, 4.0, 1.0, 2.0), (2.0, 3.0, 1.0, 2.0)]);
        let v = Ohlc4::new().compute(&bars).remove(0).values;
        assert_cell(v[0], 2.0, DEFAULT_EPSILON);
        assert_cell(v[1], 2.0, DEFAULT_EPSILON);

        bars[1].open = f64::NAN;
        let v = Ohlc4::new().compute(&bars).remove(0).values;
        assert!(v[1].is_none());
    }
}
