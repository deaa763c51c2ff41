//! Named, date-aligned numeric columns with explicit missing values.

use serde::{Deserialize, Serialize};

/// A numeric series where `None` marks warm-up rows or input gaps.
pub type Series = Vec<Option<f64>>;

/// Map a raw float to a series cell: non-finite values become `None`.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// One named column of an augmented table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Series,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Series) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// A column with no defined value on any of `len` rows.
    pub fn absent(name: impl Into<String>, len: usize) -> Self {
        Self::new(name, vec![None; len])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a row, `None` if out of bounds or undefined.
    pub fn get(&self, row: usize) -> Option<f64> {
        self.values.get(row).copied().flatten()
    }

    /// Index of the first defined value.
    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }

    /// Last defined value in the column.
    pub fn last_defined(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|v| *v)
    }

    pub fn is_all_absent(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Copy of a contiguous row range.
    pub fn slice(&self, range: std::ops::Range<usize>) -> Column {
        Column::new(self.name.clone(), self.values[range].to_vec())
    }
}
