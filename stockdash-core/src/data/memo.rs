//! Process-lifetime memo of provider responses.
//!
//! Keyed by `(TICKER, start, end)`. Successful snapshots are stored (empty
//! ones included) and shared via `Arc`; errors are returned to the caller
//! and never stored, so a transient failure can be retried. No eviction.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use tracing::debug;

use super::provider::{DataError, DataProvider, MarketSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchKey {
    /// Ticker is trimmed and upper-cased so `aapl` and `AAPL` share an entry.
    pub fn new(ticker: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            ticker: ticker.trim().to_uppercase(),
            start,
            end,
        }
    }
}

#[derive(Debug, Default)]
pub struct FetchCache {
    entries: Mutex<HashMap<FetchKey, Arc<MarketSnapshot>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<FetchKey, Arc<MarketSnapshot>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &FetchKey) -> Option<Arc<MarketSnapshot>> {
        self.entries().get(key).cloned()
    }

    /// Return the cached snapshot for `key`, or fetch it from `provider` and
    /// remember it. The lock is not held while the provider runs.
    pub fn get_or_fetch(
        &self,
        key: &FetchKey,
        provider: &dyn DataProvider,
    ) -> Result<Arc<MarketSnapshot>, DataError> {
        if let Some(hit) = self.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(ticker = %key.ticker, start = %key.start, end = %key.end, "fetch cache hit");
            return Ok(hit);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(
            ticker = %key.ticker,
            start = %key.start,
            end = %key.end,
            provider = provider.name(),
            "fetch cache miss"
        );
        let snapshot = Arc::new(provider.fetch(&key.ticker, key.start, key.end)?);
        // A concurrent fetch of the same key may have landed first; keep it.
        let stored = self
            .entries()
            .entry(key.clone())
            .or_insert(snapshot)
            .clone();
        Ok(stored)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}
