//! Donchian Channel: highest high / lowest low over trailing windows.
//!
//! The lower and upper bands may use different windows:
//! - `DCL`: min(low[t-lower+1..=t])
//! - `DCU`: max(high[t-upper+1..=t])
//! - `DCM`: (DCU + DCL) / 2 where both are defined
//!
//! Lookback: max(lower, upper) - 1.

use crate::domain::{finite, Bar, Column, Series};
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Donchian {
    lower: usize,
    upper: usize,
    name: String,
}

impl Donchian {
    pub fn new(lower: usize, upper: usize) -> Self {
        assert!(lower >= 1 && upper >= 1, "Donchian periods must be >= 1");
        Self {
            lower,
            upper,
            name: format!("DC_{lower}_{upper}"),
        }
    }

    fn column(&self, prefix: &str) -> String {
        format!("{prefix}_{}_{}", self.lower, self.upper)
    }
}

impl Indicator for Donchian {
    fn name(&self) -> &str {
        &self.name
    }

    fn outputs(&self) -> Vec<String> {
        vec![self.column("DCL"), self.column("DCM"), self.column("DCU")]
    }

    fn lookback(&self) -> usize {
        self.lower.max(self.upper) - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Column> {
        let lows: Series = bars.iter().map(|b| finite(b.low)).collect();
        let highs: Series = bars.iter().map(|b| finite(b.high)).collect();

        let dcl = rolling_extreme(&lows, self.lower, f64::min);
        let dcu = rolling_extreme(&highs, self.upper, f64::max);
        let dcm = dcl
            .iter()
            .zip(&dcu)
            .map(|(l, u)| Some(((*l)? + (*u)?) / 2.0))
            .collect();

        vec![
            Column::new(self.column("DCL"), dcl),
            Column::new(self.column("DCM"), dcm),
            Column::new(self.column("DCU"), dcu),
        ]
    }
}

/// Fold each full trailing window with `pick`; a gap undefines the window.
fn rolling_extreme(values: &[Option<f64>], period: usize, pick: fn(f64, f64) -> f64) -> Series {
    let n = values.len();
    let mut result = vec![None; n];
    for i in period.saturating_sub(1)..n {
        result[i] = values[i + 1 - period..=i]
            .iter()
            .try_fold(None, |acc: Option<f64>, v| {
                let v = (*v)?;
                Some(Some(acc.map_or(v, |a| pick(a, v))))
            })
            .flatten();
    }
    result
}
