//! Cache-first resolution of intraday datasets.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use intraday_core::{
    CacheKey, DataError, Granularity, IntradayDataset, LocalStore, Period, RemoteRequest,
    RemoteSource, ResolverConfig, Result, Symbol, WriteBack,
};

/// Resolves `(symbol, period, granularity)` requests against a local store
/// and, when allowed, a live remote source.
///
/// The policy, in order:
///
/// 1. A specific month is looked up locally under that month. "Latest" is
///    looked up under the configured fallback month when live calls are off,
///    and not looked up at all when they are on.
/// 2. A local hit is returned as is, even when live calls are enabled.
///    A miss fails when live calls are off. A corrupt or unreadable entry
///    always fails; it is never papered over with a live call.
/// 3. Otherwise exactly one live request is made, provided an API key is
///    configured.
///
/// The resolver holds no mutable state; concurrent resolutions are independent.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use intraday::{DataResolver, Granularity, Period, ResolverConfig, Symbol};
///
/// let config = Arc::new(ResolverConfig::from_env()?);
/// let resolver = DataResolver::from_config(config);
///
/// let data = resolver
///     .resolve(&Symbol::new("IBM"), "2024-01".parse::<Period>()?, Granularity::OneMinute)
///     .await;
/// ```
#[derive(Clone)]
pub struct DataResolver {
    config: Arc<ResolverConfig>,
    store: Arc<dyn LocalStore>,
    remote: Arc<dyn RemoteSource>,
}

impl std::fmt::Debug for DataResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataResolver")
            .field("config", &self.config)
            .field("store", &"configured")
            .field("remote", &self.remote.name())
            .finish()
    }
}

impl DataResolver {
    /// Create a resolver from explicit parts.
    #[must_use]
    pub fn new(
        config: Arc<ResolverConfig>,
        store: Arc<dyn LocalStore>,
        remote: Arc<dyn RemoteSource>,
    ) -> Self {
        Self {
            config,
            store,
            remote,
        }
    }

    /// Create a resolver backed by a [`FileStore`](intraday_cache::FileStore)
    /// at the configured cache directory and the Alpha Vantage source.
    #[cfg(feature = "alphavantage")]
    #[must_use]
    pub fn from_config(config: Arc<ResolverConfig>) -> Self {
        let store = Arc::new(intraday_cache::FileStore::new(config.cache_dir()));
        let remote = Arc::new(intraday_alphavantage::AlphaVantageSource::new());
        Self::new(config, store, remote)
    }

    /// Returns the configuration in use.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a dataset, collapsing every failure to `None`.
    ///
    /// The failure reason is logged; use [`DataResolver::try_resolve`] to
    /// inspect it.
    #[instrument(skip(self), fields(symbol = %symbol, period = %period, granularity = %granularity))]
    pub async fn resolve(
        &self,
        symbol: &Symbol,
        period: Period,
        granularity: Granularity,
    ) -> Option<IntradayDataset> {
        match self.try_resolve(symbol, period, granularity).await {
            Ok(data) => Some(data),
            Err(e @ DataError::NotCached(_)) => {
                debug!(error = %e, "Intraday data unavailable");
                None
            }
            Err(e) => {
                warn!(error = %e, "Intraday data unavailable");
                None
            }
        }
    }

    /// Resolve a dataset, reporting why it could not be obtained.
    ///
    /// # Errors
    ///
    /// - [`DataError::NotCached`] - local miss with live calls disabled
    /// - [`DataError::CacheCorrupt`] / [`DataError::Cache`] - local entry unusable
    /// - [`DataError::MissingCredential`] - live call needed but no API key
    /// - any error from the remote source (provider error, malformed
    ///   payload, rate limit, network)
    pub async fn try_resolve(
        &self,
        symbol: &Symbol,
        period: Period,
        granularity: Granularity,
    ) -> Result<IntradayDataset> {
        let live = self.config.live_calls();

        let lookup_month = match period {
            Period::Month(month) => Some(month),
            Period::Latest if !live => Some(self.config.fallback_period()),
            Period::Latest => None,
        };

        match lookup_month {
            Some(month) => {
                let key = CacheKey::new(symbol.clone(), month, granularity);
                match self.store.get(&key).await? {
                    Some(data) => {
                        debug!(key = %key, bars = data.len(), "Serving cached dataset");
                        return Ok(data);
                    }
                    None if !live => return Err(DataError::NotCached(key.to_string())),
                    None => debug!(key = %key, "Cache miss, trying live source"),
                }
            }
            None => debug!("Latest requested with live calls on, skipping local store"),
        }

        let api_key = self
            .config
            .api_key()
            .ok_or(DataError::MissingCredential)?;

        let request = RemoteRequest::new(symbol.clone(), period, granularity);
        debug!(source = self.remote.name(), "Fetching live intraday data");
        let data = self.remote.fetch_intraday(&request, api_key).await?;

        if let (WriteBack::WriteThrough, Period::Month(month)) = (self.config.write_back(), period)
        {
            let key = CacheKey::new(symbol.clone(), month, granularity);
            if let Err(e) = self.store.put(&key, &data).await {
                warn!(key = %key, error = %e, "Failed to write live dataset to local store");
            }
        }

        Ok(data)
    }
}
