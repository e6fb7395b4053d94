//! Resolver configuration.
//!
//! [`ResolverConfig`] is an immutable value built once (usually from the
//! environment) and handed to the resolver. The API key is an explicit
//! `Option<ApiKey>`: the placeholder value shipped in sample env files is
//! normalized to `None` at load time.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::Month;

/// Environment variable enabling live provider calls.
pub const ENV_LIVE_CALLS: &str = "INTRADAY_LIVE_CALLS";
/// Environment variable holding the provider API key.
pub const ENV_API_KEY: &str = "ALPHA_VANTAGE_API_KEY";
/// Environment variable holding the fallback month for "latest" requests.
pub const ENV_FALLBACK_PERIOD: &str = "INTRADAY_FALLBACK_PERIOD";
/// Environment variable holding the cache directory.
pub const ENV_CACHE_DIR: &str = "INTRADAY_CACHE_DIR";
/// Environment variable selecting the write-back policy.
pub const ENV_WRITE_BACK: &str = "INTRADAY_WRITE_BACK";

/// Placeholder API key value treated as unset.
pub const API_KEY_PLACEHOLDER: &str = "YOUR_ALPHA_VANTAGE_API_KEY";

const DEFAULT_FALLBACK_PERIOD: Month = match Month::new(2024, 1) {
    Some(m) => m,
    None => panic!("default fallback period must be a valid month"),
};
const DEFAULT_CACHE_DIR: &str = "data/intraday";

/// A provider API key.
///
/// `Debug` never reveals the key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a key, returning `None` for blank input or the placeholder.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() || key == API_KEY_PLACEHOLDER {
            None
        } else {
            Some(Self(key))
        }
    }

    /// Returns the raw key for use in a request.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Whether live results are persisted into the local store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WriteBack {
    /// Live results are never stored.
    #[default]
    Never,
    /// Live results for a specific month are stored under their cache key.
    WriteThrough,
}

impl WriteBack {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "never" | "off" | "none" => Some(Self::Never),
            "write-through" | "write_through" | "on" => Some(Self::WriteThrough),
            _ => None,
        }
    }
}

/// Immutable settings consulted on every resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    live_calls: bool,
    api_key: Option<ApiKey>,
    fallback_period: Month,
    cache_dir: PathBuf,
    write_back: WriteBack,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_DIR, DEFAULT_FALLBACK_PERIOD)
    }
}

impl ResolverConfig {
    /// Creates a config with live calls disabled and no API key.
    #[must_use]
    pub fn new(cache_dir: impl Into<PathBuf>, fallback_period: Month) -> Self {
        Self {
            live_calls: false,
            api_key: None,
            fallback_period,
            cache_dir: cache_dir.into(),
            write_back: WriteBack::Never,
        }
    }

    /// Enables or disables live provider calls.
    #[must_use]
    pub const fn with_live_calls(mut self, enabled: bool) -> Self {
        self.live_calls = enabled;
        self
    }

    /// Sets the API key (blank or placeholder keys are dropped).
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = ApiKey::new(key);
        self
    }

    /// Sets the write-back policy.
    #[must_use]
    pub const fn with_write_back(mut self, policy: WriteBack) -> Self {
        self.write_back = policy;
        self
    }

    /// Loads the config from process environment variables.
    ///
    /// # Errors
    /// See [`ResolverConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads the config through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for a malformed fallback period or
    /// write-back policy, and [`ConfigError::MissingCredential`] when live
    /// calls are enabled without a usable API key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let live_calls = var(ENV_LIVE_CALLS)
            .map(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes" | "y" | "on"))
            .unwrap_or(false);

        let api_key = var(ENV_API_KEY).and_then(ApiKey::new);

        let fallback_period = match var(ENV_FALLBACK_PERIOD) {
            Some(s) => s.parse().map_err(|e: crate::DataError| ConfigError::Invalid {
                name: ENV_FALLBACK_PERIOD,
                value: s.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_FALLBACK_PERIOD,
        };

        let cache_dir = var(ENV_CACHE_DIR)
            .map_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR), PathBuf::from);

        let write_back = match var(ENV_WRITE_BACK) {
            Some(s) => WriteBack::parse(&s).ok_or_else(|| ConfigError::Invalid {
                name: ENV_WRITE_BACK,
                value: s.clone(),
                reason: "expected `never` or `write-through`".to_string(),
            })?,
            None => WriteBack::Never,
        };

        if live_calls && api_key.is_none() {
            return Err(ConfigError::MissingCredential(ENV_API_KEY));
        }

        Ok(Self {
            live_calls,
            api_key,
            fallback_period,
            cache_dir,
            write_back,
        })
    }

    /// Whether live provider calls are allowed.
    #[must_use]
    pub const fn live_calls(&self) -> bool {
        self.live_calls
    }

    /// The usable API key, if one is configured.
    #[must_use]
    pub const fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    /// Month served for "latest" requests while live calls are disabled.
    #[must_use]
    pub const fn fallback_period(&self) -> Month {
        self.fallback_period
    }

    /// Directory holding cached datasets.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Live-result persistence policy.
    #[must_use]
    pub const fn write_back(&self) -> WriteBack {
        self.write_back
    }
}
