//! Market data: providers, the circuit breaker, and the fetch memo.

pub mod circuit_breaker;
pub mod csv_file;
pub mod memo;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

use std::sync::Arc;
use std::time::Duration;

pub use circuit_breaker::CircuitBreaker;
pub use csv_file::CsvProvider;
pub use memo::{FetchCache, FetchKey};
pub use provider::{DataError, DataProvider, DataSource, MarketSnapshot};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;

use crate::config::{ProviderConfig, ProviderKind};

/// Construct the provider selected in the config.
pub fn build_provider(config: &ProviderConfig) -> Result<Box<dyn DataProvider>, DataError> {
    Ok(match config.kind {
        ProviderKind::Yahoo => {
            let breaker = Arc::new(CircuitBreaker::new(
                Duration::from_secs(config.cooldown_secs),
                3,
            ));
            Box::new(YahooProvider::new(
                breaker,
                Duration::from_secs(config.timeout_secs),
                config.max_retries,
                Duration::from_millis(config.base_delay_ms),
            )?)
        }
        ProviderKind::Csv => Box::new(CsvProvider::new(&config.csv_dir)),
        ProviderKind::Synthetic => Box::new(SyntheticProvider::new(
            config.synthetic_seed,
            config.synthetic_max_days,
        )),
    })
}
