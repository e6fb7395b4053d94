//! Error types for data operations.
//!
//! This module defines [`DataError`], which covers every way a resolution can
//! fail (cache, credential, provider, transport), and [`ConfigError`] for
//! configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving intraday data.
#[derive(Error, Debug)]
pub enum DataError {
    /// Network-related errors (connection failures, non-success status, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit or quota notice returned by a provider.
    #[error("Rate limited by {provider}: {message}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Notice text returned by the provider.
        message: String,
    },

    /// The provider answered with an explicit error message.
    #[error("Provider {provider} reported an error: {message}")]
    Provider {
        /// The provider that reported the error.
        provider: String,
        /// Error text returned by the provider.
        message: String,
    },

    /// The provider response did not contain the expected time-series envelope.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// No cache entry exists and live calls are disabled.
    #[error("No cached data for {0} and live calls are disabled")]
    NotCached(String),

    /// A cache entry exists but could not be deserialized.
    #[error("Corrupt cache entry at {}: {reason}", path.display())]
    CacheCorrupt {
        /// Location of the offending entry.
        path: PathBuf,
        /// Deserialization failure.
        reason: String,
    },

    /// Error interacting with the cache (I/O, permissions).
    #[error("Cache error: {0}")]
    Cache(String),

    /// A live call was required but no usable API key is configured.
    #[error("No usable API key configured for live calls")]
    MissingCredential,

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors raised while building a [`ResolverConfig`](crate::config::ResolverConfig).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Live calls are enabled but the API key is unset or still the placeholder.
    #[error("live calls are enabled but {0} is unset or a placeholder")]
    MissingCredential(&'static str),

    /// A variable is present but its value cannot be used.
    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
