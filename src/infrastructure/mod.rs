//! Infrastructure layer: rate limiting (MODULE C), HTTP client (MODULE D),
//! caching (MODULE E), and provider adapters/aggregation (MODULES F-J).

pub mod cache;
pub mod http_client;
pub mod providers;
pub mod rate_limiter;
