//! Input series an indicator reads from a bar.

use crate::domain::{finite, Bar, Series};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Close,
    Volume,
    /// (open + high + low + close) / 4.
    Ohlc4,
}

impl Source {
    pub fn extract(self, bars: &[Bar]) -> Series {
        match self {
            Source::Close => bars.iter().map(|b| finite(b.close)).collect(),
            Source::Volume => bars.iter().map(|b| Some(b.volume as f64)).collect(),
            Source::Ohlc4 => bars.iter().map(Bar::ohlc4).collect(),
        }
    }

    /// Column name for a moving average of this source, e.g. `SMA_50`,
    /// `VOLUME_SMA_20`, `EMA_10_OHLC4`.
    pub fn column_name(self, stem: &str, period: usize) -> String {
        match self {
            Source::Close => format!("{stem}_{period}"),
            Source::Volume => format!("VOLUME_{stem}_{period}"),
            Source::Ohlc4 => format!("{stem}_{period}_OHLC4"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn close_gaps_become_none() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0]);
        bars[1].close = f64::NAN;
        assert_eq!(Source::Close.extract(&bars), vec![Some(10.0), None, Some(12.0)]);
    }

    #[test]
    fn column_names_follow_source() {
        assert_eq!(Source::Close.column_name("SMA", 50), "SMA_50");
        assert_eq!(Source::Volume.column_name("SMA", 20), "VOLUME_SMA_20");
        assert_eq!(Source::Ohlc4.column_name("EMA", 10), "EMA_10_OHLC4");
    }
}
