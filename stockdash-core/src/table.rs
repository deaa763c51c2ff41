//! The augmented table: a date axis plus named, row-aligned columns.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{finite, Bar, Column};

/// Canonical column names.
pub mod cols {
    pub const DATE: &str = "Date";
    pub const OPEN: &str = "Open";
    pub const HIGH: &str = "High";
    pub const LOW: &str = "Low";
    pub const CLOSE: &str = "Close";
    pub const ADJ_CLOSE: &str = "Adj Close";
    pub const VOLUME: &str = "Volume";

    pub const SMA_50: &str = "SMA_50";
    pub const SMA_200: &str = "SMA_200";
    pub const BBL: &str = "BBL_20_2.0";
    pub const BBM: &str = "BBM_20_2.0";
    pub const BBU: &str = "BBU_20_2.0";
    pub const BBB: &str = "BBB_20_2.0";
    pub const BBP: &str = "BBP_20_2.0";
    pub const RSI: &str = "RSI_14";
    pub const MACD: &str = "MACD_12_26_9";
    pub const MACD_HIST: &str = "MACDh_12_26_9";
    pub const MACD_SIGNAL: &str = "MACDs_12_26_9";
    pub const VOLUME_SMA: &str = "VOLUME_SMA_20";
    pub const OHLC4: &str = "OHLC4";
    pub const DCL: &str = "DCL_10_15";
    pub const DCM: &str = "DCM_10_15";
    pub const DCU: &str = "DCU_10_15";
    pub const EMA_OHLC4: &str = "EMA_10_OHLC4";
    pub const ADX: &str = "ADX_14";
    pub const DMP: &str = "DMP_14";
    pub const DMN: &str = "DMN_14";
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("column {name} has {actual} rows, table has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("column {0} already exists")]
    DuplicateColumn(String),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// OHLCV bars plus indicator columns, aligned on one date axis.
///
/// Dates are strictly increasing. Columns keep insertion order, so exports
/// list base OHLCV first and indicators in battery order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentedTable {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl AugmentedTable {
    /// Base table from bars already sorted by date.
    pub fn from_bars(bars: &[Bar]) -> Self {
        let base = |name: &str, f: fn(&Bar) -> f64| {
            Column::new(name, bars.iter().map(|b| finite(f(b))).collect())
        };
        Self {
            dates: bars.iter().map(|b| b.date).collect(),
            columns: vec![
                base(cols::OPEN, |b| b.open),
                base(cols::HIGH, |b| b.high),
                base(cols::LOW, |b| b.low),
                base(cols::CLOSE, |b| b.close),
                base(cols::ADJ_CLOSE, |b| b.adj_close),
                base(cols::VOLUME, |b| b.volume as f64),
            ],
        }
    }

    /// Build directly from parts; every column must match the date count.
    pub fn from_parts(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Result<Self, TableError> {
        let mut table = Self {
            dates,
            columns: Vec::with_capacity(columns.len()),
        };
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Latest date present, the anchor for trailing windows.
    pub fn max_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn push_column(&mut self, column: Column) -> Result<(), TableError> {
        if column.len() != self.len() {
            return Err(TableError::LengthMismatch {
                expected: self.len(),
                actual: column.len(),
                name: column.name,
            });
        }
        if self.column(&column.name).is_some() {
            return Err(TableError::DuplicateColumn(column.name));
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        self.column(name)?.get(row)
    }

    /// Most recent defined value of a column.
    pub fn last_value(&self, name: &str) -> Option<f64> {
        self.column(name)?.last_defined()
    }

    /// Write the table as CSV: `Date` then every column, empty cells for
    /// undefined values.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut wtr = csv::Writer::from_writer(writer);
        let mut header = vec![cols::DATE.to_string()];
        header.extend(self.column_names().map(str::to_string));
        wtr.write_record(&header)?;

        for (row, date) in self.dates.iter().enumerate() {
            let mut record = vec![date.format("%Y-%m-%d").to_string()];
            record.extend(
                self.columns
                    .iter()
                    .map(|c| c.get(row).map(|v| v.to_string()).unwrap_or_default()),
            );
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn save_csv(&self, path: &Path) -> Result<(), TableError> {
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))
    }
}
