//! Shared two-phase poll loop (MODULE G), grounded on
//! `original_source/.../providers/skyscanner/{api_client,skyscanner_provider}.py`
//! and the near-duplicate `rapidapi_skyscanner/api_client.py`. Both back-ends
//! share this exact session-then-poll shape; only their endpoints, auth
//! headers, and payload field names differ, so the loop itself is hoisted
//! here and parameterized over a small trait.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DomainError;

pub const MAX_POLL_ATTEMPTS: u32 = 10;
pub const POLL_INTERVAL_SECONDS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    Complete,
    InProgress,
    Failed,
    Unknown,
}

#[async_trait]
pub trait PollingBackend: Send + Sync {
    fn provider_name(&self) -> &str;

    /// Phase 1: create a session, returning the opaque session token.
    async fn create_session(&self) -> Result<String, DomainError>;

    /// Phase 2: poll once, returning the raw response body and its status.
    async fn poll_once(&self, session_token: &str) -> Result<(Value, PollStatus), DomainError>;
}

/// Runs phase 1 then polls up to [`MAX_POLL_ATTEMPTS`] times, sleeping
/// [`POLL_INTERVAL_SECONDS`] between attempts, returning the final body on
/// `Complete`. `Failed` is mapped to a `PollFailed` ProviderError explicitly
/// (this is the fix over the original's unhandled `STATUS_FAILED`, per
/// spec §9). Any other unrecognized status aborts immediately. Exceeding
/// the attempt cap without completion yields a `Timeout` error.
pub async fn run_two_phase_poll(backend: &dyn PollingBackend) -> Result<Value, DomainError> {
    let session_token = backend.create_session().await?;

    for _attempt in 0..MAX_POLL_ATTEMPTS {
        let (body, status) = backend.poll_once(&session_token).await?;
        match status {
            PollStatus::Complete => return Ok(body),
            PollStatus::InProgress => {
                tokio::time::sleep(Duration::from_secs_f64(POLL_INTERVAL_SECONDS)).await;
                continue;
            }
            PollStatus::Failed => {
                return Err(DomainError::PollFailed {
                    provider: backend.provider_name().to_string(),
                    message: "back-end reported poll status FAILED".to_string(),
                });
            }
            PollStatus::Unknown => {
                return Err(DomainError::provider(
                    backend.provider_name(),
                    "back-end reported an unrecognized poll status",
                ));
            }
        }
    }

    Err(DomainError::Timeout {
        provider: backend.provider_name().to_string(),
        timeout_seconds: MAX_POLL_ATTEMPTS as f64 * POLL_INTERVAL_SECONDS,
    })
}
