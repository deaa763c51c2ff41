//! Dashboard configuration, stored as TOML.
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) yields a working Yahoo-backed setup.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::request::InvertedRangePolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Csv,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub cooldown_secs: u64,
    pub csv_dir: PathBuf,
    pub synthetic_seed: u64,
    pub synthetic_max_days: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Yahoo,
            timeout_secs: 30,
            max_retries: 3,
            base_delay_ms: 500,
            cooldown_secs: 30 * 60,
            csv_dir: PathBuf::from("data"),
            synthetic_seed: 42,
            synthetic_max_days: 2500,
        }
    }
}

/// Defaults for the input surface. The end date is always "today" unless the
/// user picks one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
    pub ticker: String,
    pub start: NaiveDate,
    pub inverted_range: InvertedRangePolicy,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            ticker: "AAPL".to_string(),
            start: NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN),
            inverted_range: InvertedRangePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub provider: ProviderConfig,
    pub request: RequestDefaults,
    pub logging: LoggingConfig,
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = DashboardConfig::from_toml("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.provider.kind, ProviderKind::Yahoo);
        assert_eq!(config.request.ticker, "AAPL");
        assert_eq!(
            config.request.start,
            NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()
        );
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = DashboardConfig::from_toml(
            r#"
            [provider]
            kind = "synthetic"
            synthetic_seed = 7

            [request]
            ticker = "MSFT"
            inverted_range = "reject"
            "#,
        )
        .unwrap();
        assert_eq!(config.provider.kind, ProviderKind::Synthetic);
        assert_eq!(config.provider.synthetic_seed, 7);
        assert_eq!(config.provider.max_retries, 3);
        assert_eq!(config.request.ticker, "MSFT");
        assert_eq!(config.request.inverted_range, InvertedRangePolicy::Reject);
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = DashboardConfig::default();
        config.provider.kind = ProviderKind::Csv;
        config.provider.csv_dir = PathBuf::from("/tmp/prices");
        config.request.inverted_range = InvertedRangePolicy::PassThrough;

        let text = config.to_toml().unwrap();
        assert_eq!(DashboardConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn unknown_provider_kind_is_parse_error() {
        let err = DashboardConfig::from_toml("[provider]\nkind = \"bloomberg\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_or_default_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockdash.toml");
        assert_eq!(
            DashboardConfig::load_or_default(&path).unwrap(),
            DashboardConfig::default()
        );

        std::fs::write(&path, "[logging]\nfilter = \"debug\"\n").unwrap();
        let config = DashboardConfig::load_or_default(&path).unwrap();
        assert_eq!(config.logging.filter, "debug");
    }
}
