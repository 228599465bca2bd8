//! Provider base shape (MODULE F), grounded on
//! `original_source/.../infrastructure/providers/base_provider.py`.

use async_trait::async_trait;

use crate::domain::{Flight, SearchCriteria};
use crate::error::DomainError;
use crate::infrastructure::rate_limiter::RateLimiter;
use crate::result_ext::capture_async;

/// Every back-end adapter, the cache wrapper, and the aggregator all
/// implement this — the "duck-typed provider interface → explicit
/// capability set" redesign flag from spec §9.
#[async_trait]
pub trait FlightProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Flight>, DomainError>;

    /// Attempts a non-blocking rate-limit token acquire; `true` by default
    /// for composite providers (cache wrapper, aggregator) that have no
    /// rate limiter of their own.
    async fn is_available(&self) -> bool {
        true
    }
}

/// Fixed flow every concrete back-end adapter shares: acquire a rate-limit
/// token, run the back-end-specific search, classify any failure. Adapters
/// call this from their `FlightProvider::search` impl rather than
/// reimplementing the shape themselves.
pub async fn run_provider_search<F, Fut>(
    provider_name: &str,
    limiter: &RateLimiter,
    perform_search: F,
) -> Result<Vec<Flight>, DomainError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<Vec<Flight>, DomainError>>,
{
    limiter.acquire().await;
    capture_async(perform_search())
        .await
        .map_err(|e| tag_provider(provider_name, e))
}

fn tag_provider(provider_name: &str, err: DomainError) -> DomainError {
    match err {
        DomainError::Provider {
            message,
            original_error,
            original_type,
            ..
        } => DomainError::Provider {
            message,
            provider: provider_name.to_string(),
            original_error,
            original_type,
        },
        DomainError::RateLimit { retry_after, .. } => DomainError::RateLimit {
            provider: provider_name.to_string(),
            retry_after,
        },
        DomainError::Timeout { timeout_seconds, .. } => DomainError::Timeout {
            provider: provider_name.to_string(),
            timeout_seconds,
        },
        DomainError::PollFailed { message, .. } => DomainError::PollFailed {
            provider: provider_name.to_string(),
            message,
        },
        other => other,
    }
}

/// Classifies a non-success HTTP status into the appropriate ProviderError
/// sub-variant, per spec §4.5. `retry_after` is the parsed `Retry-After`
/// header value in seconds, if present and numeric.
pub fn classify_http_status(
    provider_name: &str,
    status: u16,
    retry_after: Option<f64>,
) -> DomainError {
    if status == 429 {
        return DomainError::RateLimit {
            provider: provider_name.to_string(),
            retry_after,
        };
    }
    DomainError::provider(
        provider_name,
        format!("back-end responded with status {status}"),
    )
}

pub fn classify_timeout(provider_name: &str, timeout_seconds: f64) -> DomainError {
    DomainError::Timeout {
        provider: provider_name.to_string(),
        timeout_seconds,
    }
}
