//! In-memory store implementation.

use async_trait::async_trait;
use intraday_core::{CacheKey, IntradayDataset, LocalStore, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Simple in-memory store for testing and development.
///
/// Data is stored in a `RwLock`-protected `HashMap` and is lost when the store
/// is dropped. Datasets are cloned on get/put operations.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<CacheKey, IntradayDataset>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with one entry.
    #[must_use]
    pub fn with_entry(key: CacheKey, data: IntradayDataset) -> Self {
        Self {
            entries: RwLock::new(HashMap::from([(key, data)])),
        }
    }

    /// Returns the number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl LocalStore for InMemoryStore {
    #[instrument(skip(self), fields(key = %key))]
    async fn get(&self, key: &CacheKey) -> Result<Option<IntradayDataset>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(data) => {
                debug!("Cache hit");
                Ok(Some(data.clone()))
            }
            None => {
                debug!("Cache miss");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, data), fields(key = %key, bars = data.len()))]
    async fn put(&self, key: &CacheKey, data: &IntradayDataset) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.clone(), data.clone());
        debug!("Stored dataset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intraday_core::{Granularity, Month, PriceBar, Symbol};

    fn key(symbol: &str) -> CacheKey {
        CacheKey::new(
            Symbol::new(symbol),
            Month::new(2024, 3).unwrap(),
            Granularity::OneMinute,
        )
    }

    fn sample() -> IntradayDataset {
        [("2024-03-01 09:30:00".to_string(), PriceBar::new("10.0"))]
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn test_get_miss_then_hit() {
        let store = InMemoryStore::new();
        assert!(store.get(&key("MSFT")).await.unwrap().is_none());

        store.put(&key("MSFT"), &sample()).await.unwrap();

        assert_eq!(store.get(&key("MSFT")).await.unwrap(), Some(sample()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_keys_are_distinct() {
        let store = InMemoryStore::with_entry(key("MSFT"), sample());

        assert!(store.get(&key("AAPL")).await.unwrap().is_none());
        assert!(!store.is_empty().await);
    }
}
