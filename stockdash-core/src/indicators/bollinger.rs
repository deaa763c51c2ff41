//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Five columns from one pass:
//! - `BBM`: SMA(close, period)
//! - `BBU` / `BBL`: middle +/- mult * stddev(close, period)
//! - `BBB`: bandwidth, (upper - lower) / middle * 100
//! - `BBP`: %B, (close - lower) / (upper - lower)
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use crate::domain::{finite, Bar, Column};
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    name: String,
    suffix: String,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let suffix = format!("{period}_{multiplier:.1}");
        Self {
            period,
            multiplier,
            name: format!("BBANDS_{suffix}"),
            suffix,
        }
    }

    fn column(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.suffix)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn outputs(&self) -> Vec<String> {
        ["BBL", "BBM", "BBU", "BBB", "BBP"]
            .iter()
            .map(|p| self.column(p))
            .collect()
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Column> {
        let n = bars.len();
        let closes: Vec<Option<f64>> = bars.iter().map(|b| finite(b.close)).collect();
        let mut lower = vec![None; n];
        let mut middle = vec![None; n];
        let mut upper = vec![None; n];
        let mut bandwidth = vec![None; n];
        let mut percent = vec![None; n];

        for i in (self.period - 1)..n {
            let window = &closes[i + 1 - self.period..=i];
            let Some(window) = window.iter().copied().collect::<Option<Vec<f64>>>() else {
                continue;
            };

            let mean = window.iter().sum::<f64>() / self.period as f64;
            let variance =
                window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / self.period as f64;
            let offset = self.multiplier * variance.sqrt();
            let (lo, hi) = (mean - offset, mean + offset);

            lower[i] = Some(lo);
            middle[i] = Some(mean);
            upper[i] = Some(hi);
            if mean != 0.0 {
                bandwidth[i] = Some((hi - lo) / mean * 100.0);
            }
            if hi != lo {
                percent[i] = closes[i].map(|c| (c - lo) / (hi - lo));
            }
        }

        vec![
            Column::new(self.column("BBL"), lower),
            Column::new(self.column("BBM"), middle),
            Column::new(self.column("BBU"), upper),
            Column::new(self.column("BBB"), bandwidth),
            Column::new(self.column("BBP"), percent),
        ]
    }
}
