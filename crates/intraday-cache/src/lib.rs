#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/intraday/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Local store implementations for intraday datasets.
//!
//! This crate provides implementations of the [`LocalStore`] trait from `intraday-core`:
//!
//! - [`FileStore`] - One JSON file per cache key under a directory
//! - [`InMemoryStore`] - Simple in-memory store for testing
//! - [`NoopStore`] - Store that never holds anything

/// JSON file store implementation.
pub mod file;
/// In-memory store implementation.
pub mod memory;
/// No-op store implementation.
pub mod noop;

// Re-export the trait for convenience
pub use intraday_core::LocalStore;

// Re-export implementations
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use noop::NoopStore;
