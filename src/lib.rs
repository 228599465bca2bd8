//! # flight-finder
//!
//! A multi-provider flight-search aggregation library. Fans a single
//! search out across several third-party flight APIs concurrently,
//! normalizes their wildly inconsistent response shapes into one domain
//! model, deduplicates itineraries surfaced by more than one back-end, and
//! caches results behind a shared token-bucket rate limiter per provider.
//!
//! The binary target (`flight-finder-mcp`) exposes this as three MCP tools
//! over stdio; the library itself has no I/O dependency on that transport.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod presentation;
pub mod result_ext;

pub use config::Settings;
pub use error::{DomainError, DomainResult};
