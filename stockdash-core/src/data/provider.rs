//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, CSV
//! files, the synthetic generator) so the dashboard can swap implementations
//! and tests can mock them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Bar, CompanyProfile};

/// Structured error types for data operations.
///
/// These are designed to be displayable in both CLI and TUI contexts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("provider is blocking requests, retry in {retry_in_secs}s")]
    CircuitBreakerTripped { retry_in_secs: u64 },

    #[error("invalid data for {symbol}: {reason}")]
    Invalid { symbol: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("data error: {0}")]
    Other(String),
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

impl DataSource {
    pub fn label(self) -> &'static str {
        match self {
            DataSource::YahooFinance => "Yahoo Finance",
            DataSource::CsvImport => "CSV",
            DataSource::Synthetic => "synthetic",
        }
    }
}

/// One provider response: the daily series and the company profile.
///
/// An empty series or an absent profile is a valid response.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub bars: Vec<Bar>,
    pub profile: Option<CompanyProfile>,
    pub source: DataSource,
}

impl MarketSnapshot {
    pub fn empty(source: DataSource) -> Self {
        Self {
            bars: Vec::new(),
            profile: None,
            source,
        }
    }
}

/// Trait for market data providers.
///
/// The memo cache sits above this trait; providers don't know about it.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars and the company profile for a ticker over an
    /// inclusive date range.
    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<MarketSnapshot, DataError>;

    /// Whether the provider currently accepts requests.
    fn is_available(&self) -> bool {
        true
    }
}
