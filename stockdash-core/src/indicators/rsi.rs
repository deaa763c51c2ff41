//! Relative Strength Index (RSI).
//!
//! Uses Wilder smoothing of average gains and average losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period.
//! Edge cases: avg_loss == 0 → RSI = 100; avg_gain == 0 → RSI = 0;
//! no movement at all → RSI = 50.

use crate::domain::{finite, Bar, Column};
use crate::indicators::wilder::wilder_smooth;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("RSI_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn outputs(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Column> {
        let n = bars.len();
        let mut gains = vec![None; n];
        let mut losses = vec![None; n];
        // Changes are taken against the last defined close, so a missing
        // close only blanks its own row.
        let mut prev_close: Option<f64> = None;
        for (i, bar) in bars.iter().enumerate() {
            let Some(curr) = finite(bar.close) else {
                continue;
            };
            if let Some(prev) = prev_close {
                let change = curr - prev;
                gains[i] = Some(change.max(0.0));
                losses[i] = Some((-change).max(0.0));
            }
            prev_close = Some(curr);
        }

        let avg_gain = wilder_smooth(&gains, self.period);
        let avg_loss = wilder_smooth(&losses, self.period);
        let values = avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(g, l)| Some(compute_rsi((*g)?, (*l)?)))
            .collect();

        vec![Column::new(self.name.clone(), values)]
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_cell, make_bars};

    fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
        Rsi::new(period).compute(&make_bars(closes)).remove(0).values
    }

    #[test]
    fn rsi_all_gains() {
        let result = rsi(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0], 3);
        assert!(result[..3].iter().all(Option::is_none));
        assert_cell(result[3], 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses() {
        let result = rsi(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0], 3);
        assert_cell(result[3], 0.0, 1e-6);
    }

    #[test]
    fn rsi_flat_is_fifty() {
        let result = rsi(&[10.0; 6], 3);
        assert_cell(result[3], 50.0, 1e-9);
        assert_cell(result[5], 50.0, 1e-9);
    }

    #[test]
    fn rsi_mixed() {
        // changes: +0.34, -0.25, -0.48, +0.72
        // seed over the first 3: avg_gain = 0.34/3, avg_loss = 0.73/3
        let result = rsi(&[44.0, 44.34, 44.09, 43.61, 44.33], 3);
        let expected_seed = 100.0 - 100.0 / (1.0 + 0.34 / 0.73);
        assert_cell(result[3], expected_seed, 1e-9);

        let gain = (2.0 / 3.0) * (0.34 / 3.0) + 0.72 / 3.0;
        let loss = (2.0 / 3.0) * (0.73 / 3.0);
        assert_cell(result[4], 100.0 - 100.0 / (1.0 + gain / loss), 1e-9);
    }

    #[test]
    fn rsi_14_first_value_at_index_14() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + ((i * 7) % 5) as f64).collect();
        let result = rsi(&closes, 14);
        assert!(result[..14].iter().all(Option::is_none));
        assert!(result[14].is_some());
    }

    #[test]
    fn rsi_missing_close_blanks_only_its_row() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.4).sin() * 6.0).collect();
        let mut bars = make_bars(&closes);
        bars[30].close = f64::NAN;
        let result = Rsi::new(14).compute(&bars).remove(0).values;
        assert!(result[29].is_some());
        assert!(result[30].is_none());
        assert!(result[31..].iter().all(Option::is_some));
    }

    #[test]
    fn rsi_stays_in_range() {
        let closes: Vec<f64> = (0..200)
            .map(|i| 100.0 + (i as f64 * 0.37).sin() * 20.0 + (i as f64 * 1.3).cos() * 5.0)
            .collect();
        for v in rsi(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "RSI out of range: {v}");
        }
    }
}
