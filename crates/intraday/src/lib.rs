#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/intraday/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Cache-first intraday data resolution and climb pattern analysis.
//!
//! This crate re-exports the core types, store implementations and the live
//! source, and adds:
//!
//! - [`DataResolver`] - decides per request between the local store and a
//!   live call
//! - [`climb`] - fixed-window momentum analysis over a resolved series
//!
//! # Features
//!
//! - `alphavantage` - Alpha Vantage remote source and [`DataResolver::from_config`]
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use intraday::{climb, DataResolver, Granularity, Period, ResolverConfig, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = DataResolver::from_config(Arc::new(ResolverConfig::from_env()?));
//!
//!     let symbol = Symbol::new("IBM");
//!     let data = resolver
//!         .resolve(&symbol, Period::Latest, Granularity::OneMinute)
//!         .await;
//!
//!     let report = climb::analyze(symbol.as_str(), data.as_ref());
//!     println!("{report:?}");
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use intraday_core::*;

// Store implementations
pub use intraday_cache::{FileStore, InMemoryStore, NoopStore};

// Remote sources
#[cfg(feature = "alphavantage")]
pub use intraday_alphavantage::AlphaVantageSource;

pub mod climb;
pub use climb::{ClimbAnalysis, ClimbError, ClimbSignal, ClimbWindow};

mod resolver;
pub use resolver::DataResolver;
