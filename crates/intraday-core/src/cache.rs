//! Local store trait for cached intraday datasets.
//!
//! This module defines the [`LocalStore`] trait that provides a unified
//! interface over wherever previously captured datasets live.

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{CacheKey, IntradayDataset},
};

/// Trait for reading (and optionally writing) cached intraday datasets.
///
/// Implementations must keep "absent" and "present but unusable" apart:
///
/// - `Ok(None)` - no entry exists for the key
/// - `Err(DataError::CacheCorrupt { .. })` - an entry exists but does not deserialize
/// - `Err(DataError::Cache(_))` - the entry could not be read at all
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Retrieves the dataset stored under `key`.
    async fn get(&self, key: &CacheKey) -> Result<Option<IntradayDataset>>;

    /// Stores a dataset under `key`, replacing any existing entry.
    async fn put(&self, key: &CacheKey, data: &IntradayDataset) -> Result<()>;
}
