//! Trailing display windows over the augmented table.
//!
//! A window keeps the contiguous run of rows whose date is on or after
//! `max_date - n days`, where `max_date` is the latest date in the data (not
//! today). Windows never mutate the table; each chart gets its own copy of the
//! columns it surfaces.

use std::ops::Range;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::domain::Column;
use crate::table::AugmentedTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Window {
    /// Every row.
    Full,
    /// Rows within `n` calendar days of the latest date, inclusive.
    TrailingDays(u32),
}

impl Window {
    pub fn label(&self) -> String {
        match self {
            Window::Full => "full history".to_string(),
            Window::TrailingDays(n) => format!("last {n} days"),
        }
    }

    /// Row range selected from a strictly increasing date axis.
    pub fn range(&self, dates: &[NaiveDate]) -> Range<usize> {
        match (self, dates.last()) {
            (Window::Full, _) | (_, None) => 0..dates.len(),
            (Window::TrailingDays(n), Some(&max_date)) => {
                let cutoff = max_date - Duration::days(i64::from(*n));
                dates.partition_point(|d| *d < cutoff)..dates.len()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("column {0} is not in the table")]
    MissingColumn(String),
}

/// Read-only trailing slice of selected columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayWindow {
    window: Window,
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl DisplayWindow {
    /// Slice `names` out of the table. Every name must exist.
    pub fn from_table(
        table: &AugmentedTable,
        window: Window,
        names: &[&str],
    ) -> Result<Self, WindowError> {
        let range = window.range(table.dates());
        let columns = names
            .iter()
            .map(|name| {
                table
                    .column(name)
                    .map(|c| c.slice(range.clone()))
                    .ok_or_else(|| WindowError::MissingColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            window,
            dates: table.dates()[range].to_vec(),
            columns,
        })
    }

    /// Apply another window to this one. Applying the same window again
    /// returns an equal value.
    pub fn rewindow(&self, window: Window) -> Self {
        let range = window.range(&self.dates);
        Self {
            window,
            dates: self.dates[range.clone()].to_vec(),
            columns: self.columns.iter().map(|c| c.slice(range.clone())).collect(),
        }
    }

    pub fn window(&self) -> Window {
        self.window
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

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}
