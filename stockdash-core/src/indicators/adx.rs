//! ADX: Average Directional Index (Wilder).
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars
//! 2. Smooth +DM, -DM, and TR using Wilder smoothing (alpha = 1/period)
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR)  → `DMP`
//! 4. -DI = 100 * smoothed(-DM) / smoothed(TR)  → `DMN`
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 6. ADX = Wilder-smoothed DX
//!
//! Lookback: 2 * period - 1 (DI defined from `period`, ADX seeds on the first
//! `period` DX values).

use crate::domain::{finite, Bar, Column, Series};
use crate::indicators::wilder::{true_range, wilder_smooth};
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    name: String,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self {
            period,
            name: format!("ADX_{period}"),
        }
    }
}

/// +DM and -DM. Row 0 is undefined; later rows compare against the last bar
/// with a defined high and low.
fn directional_movement(bars: &[Bar]) -> (Series, Series) {
    let n = bars.len();
    let mut plus_dm = vec![None; n];
    let mut minus_dm = vec![None; n];

    let mut prev: Option<(f64, f64)> = None;
    for (i, bar) in bars.iter().enumerate() {
        let (Some(h), Some(l)) = (finite(bar.high), finite(bar.low)) else {
            continue;
        };
        if let Some((ph, pl)) = prev {
            let up = h - ph;
            let down = pl - l;
            plus_dm[i] = Some(if up > down && up > 0.0 { up } else { 0.0 });
            minus_dm[i] = Some(if down > up && down > 0.0 { down } else { 0.0 });
        }
        prev = Some((h, l));
    }
    (plus_dm, minus_dm)
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn outputs(&self) -> Vec<String> {
        let p = self.period;
        vec![format!("ADX_{p}"), format!("DMP_{p}"), format!("DMN_{p}")]
    }

    fn lookback(&self) -> usize {
        2 * self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Column> {
        let n = bars.len();
        let (plus_dm, minus_dm) = directional_movement(bars);
        let smooth_tr = wilder_smooth(&true_range(bars), self.period);
        let smooth_plus = wilder_smooth(&plus_dm, self.period);
        let smooth_minus = wilder_smooth(&minus_dm, self.period);

        let mut dmp = vec![None; n];
        let mut dmn = vec![None; n];
        let mut dx = vec![None; n];
        for i in 0..n {
            let (Some(tr), Some(p), Some(m)) = (smooth_tr[i], smooth_plus[i], smooth_minus[i])
            else {
                continue;
            };
            if tr == 0.0 {
                continue;
            }
            let plus_di = 100.0 * p / tr;
            let minus_di = 100.0 * m / tr;
            let di_sum = plus_di + minus_di;

            dmp[i] = Some(plus_di);
            dmn[i] = Some(minus_di);
            dx[i] = Some(if di_sum == 0.0 {
                0.0
            } else {
                100.0 * (plus_di - minus_di).abs() / di_sum
            });
        }

        let p = self.period;
        vec![
            Column::new(format!("ADX_{p}"), wilder_smooth(&dx, p)),
            Column::new(format!("DMP_{p}"), dmp),
            Column::new(format!("DMN_{p}"), dmn),
        ]
    }
}
