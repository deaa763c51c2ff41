//! Wilder smoothing and true range, shared by RSI and ADX.

use crate::domain::{finite, Bar, Series};

/// Start of the first run of `period` consecutive defined values.
pub fn first_full_window(values: &[Option<f64>], period: usize) -> Option<usize> {
    if period == 0 {
        return None;
    }
    let mut run = 0usize;
    for (i, v) in values.iter().enumerate() {
        if v.is_some() {
            run += 1;
            if run == period {
                return Some(i + 1 - period);
            }
        } else {
            run = 0;
        }
    }
    None
}

/// True Range series.
///
/// TR[0] is undefined (no previous close), so Wilder averages of TR seed on
/// proper true ranges only. The previous close is the last defined one, so a
/// void bar only blanks its own row.
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(bars: &[Bar]) -> Series {
    let mut tr = vec![None; bars.len()];
    let mut prev_close: Option<f64> = None;
    for (i, bar) in bars.iter().enumerate() {
        let (h, l) = (finite(bar.high), finite(bar.low));
        if let (Some(h), Some(l), Some(pc)) = (h, l, prev_close) {
            tr[i] = Some((h - l).max((h - pc).abs()).max((l - pc).abs()));
        }
        if let Some(c) = finite(bar.close) {
            prev_close = Some(c);
        }
    }
    tr
}

/// Wilder smoothing (alpha = 1/period).
///
/// Seed: mean of the first run of `period` defined values, placed on the last
/// value of that run. A gap after the seed leaves that row undefined and
/// smoothing resumes from the last value.
pub fn wilder_smooth(values: &[Option<f64>], period: usize) -> Series {
    let n = values.len();
    let mut result = vec![None; n];

    let Some(seed_start) = first_full_window(values, period) else {
        return result;
    };
    let seed_end = seed_start + period;

    let seed = values[seed_start..seed_end].iter().flatten().sum::<f64>() / period as f64;
    result[seed_end - 1] = Some(seed);

    let alpha = 1.0 / period as f64;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_cell, make_ohlc_bars, DEFAULT_EPSILON};

    #[test]
    fn true_range_basic() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0), // max(8, |108-102|, |100-102|) = 8
            (106.0, 107.0, 98.0, 99.0),   // max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range(&bars);
        assert!(tr[0].is_none());
        assert_cell(tr[1], 8.0, DEFAULT_EPSILON);
        assert_cell(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let bars = make_ohlc_bars(&[
            (98.0, 102.0, 97.0, 100.0),
            (110.0, 115.0, 108.0, 112.0), // max(7, |115-100|, |108-100|) = 15
        ]);
        assert_cell(true_range(&bars)[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn wilder_period_3() {
        let values = [None, Some(8.0), Some(9.0), Some(6.0), Some(6.0)];
        let result = wilder_smooth(&values, 3);

        assert!(result[..3].iter().all(Option::is_none));
        // seed = mean(8, 9, 6); next = 6/3 + (2/3) * seed
        assert_cell(result[3], 23.0 / 3.0, DEFAULT_EPSILON);
        assert_cell(result[4], 64.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn wilder_seed_skips_early_gap_and_resumes_after_later_one() {
        let values = [Some(1.0), None, Some(2.0), Some(4.0), Some(6.0), None, Some(9.0)];
        let result = wilder_smooth(&values, 2);

        assert!(result[..3].iter().all(Option::is_none));
        assert_cell(result[3], 3.0, DEFAULT_EPSILON);
        assert_cell(result[4], 4.5, DEFAULT_EPSILON);
        assert!(result[5].is_none());
        // 9/2 + 4.5/2
        assert_cell(result[6], 6.75, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_bridges_void_close() {
        let mut bars = make_ohlc_bars(&[
            (98.0, 102.0, 97.0, 100.0),
            (100.0, 101.0, 99.0, 100.5),
            (110.0, 115.0, 108.0, 112.0),
        ]);
        bars[1].close = f64::NAN;
        let tr = true_range(&bars);
        assert_cell(tr[1], 2.0, DEFAULT_EPSILON);
        // previous defined close is 100.0 from row 0
        assert_cell(tr[2], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn first_full_window_finds_run() {
        let values = [Some(1.0), None, Some(1.0), Some(1.0), Some(1.0)];
        assert_eq!(first_full_window(&values, 3), Some(2));
        assert_eq!(first_full_window(&values, 4), None);
        assert_eq!(first_full_window(&values, 0), None);
    }
}
