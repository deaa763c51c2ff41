//! Dashboard-level error taxonomy.
//!
//! Each module has its own error enum; [`DashboardError`] attaches the ticker
//! or field being worked on and sorts failures into four user-facing kinds.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::chart::{ChartError, ChartKind};
use crate::data::DataError;
use crate::engine::IndicatorError;
use crate::format::FormatError;

/// The four kinds of failure a page can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    Provider,
    IndicatorComputation,
    Format,
    ChartRender,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Provider => "provider",
            ErrorKind::IndicatorComputation => "indicators",
            ErrorKind::Format => "format",
            ErrorKind::ChartRender => "chart",
        }
    }
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("No data available for {ticker}: {source}")]
    Provider {
        ticker: String,
        #[source]
        source: DataError,
    },

    #[error("No data available for {ticker} between {start} and {end}")]
    NoData {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("no company profile for {ticker}")]
    NoProfile { ticker: String },

    #[error("indicators for {ticker} failed: {source}")]
    IndicatorComputation {
        ticker: String,
        #[source]
        source: IndicatorError,
    },

    #[error("formatting {field} failed: {source}")]
    Format {
        field: String,
        #[source]
        source: FormatError,
    },

    #[error("{chart:?} chart for {ticker} failed: {source}")]
    ChartRender {
        ticker: String,
        chart: ChartKind,
        #[source]
        source: ChartError,
    },
}

impl DashboardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DashboardError::Provider { .. }
            | DashboardError::NoData { .. }
            | DashboardError::NoProfile { .. } => ErrorKind::Provider,
            DashboardError::IndicatorComputation { .. } => ErrorKind::IndicatorComputation,
            DashboardError::Format { .. } => ErrorKind::Format,
            DashboardError::ChartRender { .. } => ErrorKind::ChartRender,
        }
    }
}
