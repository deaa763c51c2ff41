//! Moving Average Convergence Divergence (MACD).
//!
//! MACD line = EMA(fast) - EMA(slow) of close.
//! Signal = EMA(signal) of the MACD line.
//! Histogram = MACD - signal.
//! Lookback: (slow - 1) + (signal - 1).

use crate::domain::{finite, Bar, Column};
use crate::indicators::ema::ema_of_series;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(fast < slow, "MACD fast period must be shorter than slow");
        Self {
            fast,
            slow,
            signal,
            name: format!("MACD_{fast}_{slow}_{signal}"),
        }
    }

    fn suffix(&self) -> String {
        format!("{}_{}_{}", self.fast, self.slow, self.signal)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn outputs(&self) -> Vec<String> {
        let s = self.suffix();
        vec![format!("MACD_{s}"), format!("MACDh_{s}"), format!("MACDs_{s}")]
    }

    fn lookback(&self) -> usize {
        (self.slow - 1) + (self.signal - 1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Column> {
        let closes: Vec<Option<f64>> = bars.iter().map(|b| finite(b.close)).collect();
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);

        let line: Vec<Option<f64>> = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();
        let signal = ema_of_series(&line, self.signal);
        let histogram = line
            .iter()
            .zip(&signal)
            .map(|(m, s)| Some((*m)? - (*s)?))
            .collect();

        let s = self.suffix();
        vec![
            Column::new(format!("MACD_{s}"), line),
            Column::new(format!("MACDh_{s}"), histogram),
            Column::new(format!("MACDs_{s}"), signal),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    fn closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.3).sin() * 10.0).collect()
    }

    #[test]
    fn macd_12_26_9_warm_up() {
        let cols = Macd::new(12, 26, 9).compute(&make_bars(&closes(80)));
        assert_eq!(cols[0].name, "MACD_12_26_9");
        assert_eq!(cols[1].name, "MACDh_12_26_9");
        assert_eq!(cols[2].name, "MACDs_12_26_9");

        assert_eq!(cols[0].first_defined(), Some(25));
        assert_eq!(cols[2].first_defined(), Some(33));
        assert_eq!(cols[1].first_defined(), Some(33));
    }

    #[test]
    fn histogram_is_line_minus_signal() {
        let cols = Macd::new(12, 26, 9).compute(&make_bars(&closes(80)));
        for i in 33..80 {
            let (m, h, s) = (
                cols[0].values[i].unwrap(),
                cols[1].values[i].unwrap(),
                cols[2].values[i].unwrap(),
            );
            assert_approx(h, m - s, 1e-12);
        }
    }

    #[test]
    fn constant_prices_give_zero_macd() {
        let cols = Macd::new(3, 6, 3).compute(&make_bars(&[50.0; 20]));
        for col in &cols {
            for v in col.values.iter().flatten() {
                assert_approx(*v, 0.0, 1e-12);
            }
        }
    }

    #[test]
    fn short_history_is_absent() {
        let cols = Macd::new(12, 26, 9).compute(&make_bars(&closes(20)));
        assert!(cols.iter().all(Column::is_all_absent));
        assert!(cols.iter().all(|c| c.len() == 20));
    }
}
