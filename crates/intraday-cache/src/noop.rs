//! No-op store implementation.

use async_trait::async_trait;
use intraday_core::{CacheKey, IntradayDataset, LocalStore, Result};
use tracing::trace;

/// A no-op store that doesn't hold anything.
///
/// `get` always returns `Ok(None)` and `put` always returns `Ok(())`.
/// Useful for forcing every resolution onto the live path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl NoopStore {
    /// Create a new no-op store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LocalStore for NoopStore {
    async fn get(&self, _key: &CacheKey) -> Result<Option<IntradayDataset>> {
        trace!("NoopStore: get called, returning None");
        Ok(None)
    }

    async fn put(&self, _key: &CacheKey, _data: &IntradayDataset) -> Result<()> {
        trace!("NoopStore: put called, doing nothing");
        Ok(())
    }
}
