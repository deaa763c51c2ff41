//! Indicator engine: bars in, augmented table out.
//!
//! The engine owns a list of indicators and runs each of them once over a
//! date-sorted copy of the input. Too little history for an indicator is not
//! an error; its columns come back present and entirely undefined.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::domain::bar::first_out_of_order;
use crate::domain::{Bar, Column};
use crate::indicators::{Adx, Bollinger, Donchian, Ema, Indicator, Macd, Ohlc4, Rsi, Sma};
use crate::table::{AugmentedTable, TableError};

#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("no bars to compute indicators on")]
    EmptyInput,

    #[error("column {0} has no usable values")]
    MissingColumn(String),

    #[error("duplicate bar for {0}")]
    DuplicateDate(NaiveDate),

    #[error("indicator {indicator} returned {actual} rows for {expected} bars")]
    LengthMismatch {
        indicator: String,
        expected: usize,
        actual: usize,
    },

    #[error("indicator {indicator} could not extend the table: {source}")]
    Table {
        indicator: String,
        #[source]
        source: TableError,
    },
}

/// Runs a fixed battery of indicators over a bar series.
pub struct IndicatorEngine {
    indicators: Vec<Box<dyn Indicator>>,
}

impl IndicatorEngine {
    /// The dashboard battery: SMA 50/200, Bollinger 20/2, RSI 14,
    /// MACD 12/26/9, volume SMA 20, OHLC4, Donchian 10/15, EMA 10 of OHLC4,
    /// ADX 14.
    pub fn standard() -> Self {
        Self::with_indicators(vec![
            Box::new(Sma::new(50)),
            Box::new(Sma::new(200)),
            Box::new(Bollinger::new(20, 2.0)),
            Box::new(Rsi::new(14)),
            Box::new(Macd::new(12, 26, 9)),
            Box::new(Sma::volume(20)),
            Box::new(Ohlc4::new()),
            Box::new(Donchian::new(10, 15)),
            Box::new(Ema::ohlc4(10)),
            Box::new(Adx::new(14)),
        ])
    }

    pub fn with_indicators(indicators: Vec<Box<dyn Indicator>>) -> Self {
        Self { indicators }
    }

    pub fn indicators(&self) -> &[Box<dyn Indicator>] {
        &self.indicators
    }

    /// Longest warm-up across the battery.
    pub fn warmup(&self) -> usize {
        self.indicators
            .iter()
            .map(|i| i.lookback())
            .max()
            .unwrap_or(0)
    }

    /// Compute the augmented table.
    ///
    /// Input order does not matter; a sorted copy is used.
    pub fn compute(&self, bars: &[Bar]) -> Result<AugmentedTable, IndicatorError> {
        if bars.is_empty() {
            return Err(IndicatorError::EmptyInput);
        }

        let mut sorted = bars.to_vec();
        sorted.sort_by_key(|b| b.date);
        // Once sorted, the only way to break strict ordering is a repeated date.
        if let Some(date) = first_out_of_order(&sorted) {
            return Err(IndicatorError::DuplicateDate(date));
        }
        if sorted.iter().all(|b| !b.close.is_finite()) {
            return Err(IndicatorError::MissingColumn("close".to_string()));
        }

        let mut table = AugmentedTable::from_bars(&sorted);
        for indicator in &self.indicators {
            let columns = indicator.compute(&sorted);
            debug!(
                indicator = indicator.name(),
                columns = columns.len(),
                rows = sorted.len(),
                "computed indicator"
            );
            for column in columns {
                push(&mut table, indicator.as_ref(), column)?;
            }
        }
        Ok(table)
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::standard()
    }
}

fn push(
    table: &mut AugmentedTable,
    indicator: &dyn Indicator,
    column: Column,
) -> Result<(), IndicatorError> {
    table.push_column(column).map_err(|e| match e {
        TableError::LengthMismatch {
            expected, actual, ..
        } => IndicatorError::LengthMismatch {
            indicator: indicator.name().to_string(),
            expected,
            actual,
        },
        other => IndicatorError::Table {
            indicator: indicator.name().to_string(),
            source: other,
        },
    })
}
