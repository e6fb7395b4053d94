#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/intraday/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for intraday market data.
//!
//! This crate provides the foundational abstractions shared by the workspace:
//!
//! - [`LocalStore`](cache::LocalStore) - On-disk (or in-memory) dataset cache
//! - [`RemoteSource`](provider::RemoteSource) - Live upstream intraday provider
//! - [`ResolverConfig`](config::ResolverConfig) - Immutable resolution settings
//! - [`IntradayDataset`](types::IntradayDataset) - Timestamp-keyed price bars

/// Local store trait for cached intraday datasets.
pub mod cache;
/// Resolver configuration and credential handling.
pub mod config;
/// Error types for data operations.
pub mod error;
/// Bar granularity definitions.
pub mod frequency;
/// Remote source trait for live intraday data.
pub mod provider;
/// Core data types (Symbol, Month, PriceBar, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use cache::LocalStore;
pub use config::{ApiKey, ResolverConfig, WriteBack};
pub use error::{ConfigError, DataError, Result};
pub use frequency::Granularity;
pub use provider::{OutputSize, RemoteRequest, RemoteSource};
pub use types::{CacheKey, IntradayDataset, Month, Period, PriceBar, Symbol};
