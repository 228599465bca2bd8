//! RapidAPI-hosted Skyscanner adapter (two-phase poll shape), grounded on
//! `original_source/.../providers/rapidapi_skyscanner/api_client.py` — a
//! near-duplicate of the direct partner client with a different host, auth
//! header, and endpoint paths. Reuses [`skyscanner::map_poll_response`]
//! rather than re-deriving the same graph-of-IDs parsing logic, since
//! RapidAPI proxies the identical response shape.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Flight, SearchCriteria};
use crate::error::DomainError;
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::providers::base::{run_provider_search, FlightProvider};
use crate::infrastructure::providers::poll::{run_two_phase_poll, PollStatus, PollingBackend};
use crate::infrastructure::providers::skyscanner::map_poll_response;
use crate::infrastructure::rate_limiter::RateLimiter;

pub const PROVIDER_NAME: &str = "rapidapi_skyscanner";
const HOST: &str = "skyscanner89.p.rapidapi.com";
const CREATE_URL: &str = "https://skyscanner89.p.rapidapi.com/flights/search-roundtrip";
const POLL_URL: &str = "https://skyscanner89.p.rapidapi.com/flights/search-incomplete";

pub struct RapidApiSkyscannerProvider {
    http: Arc<HttpClient>,
    limiter: RateLimiter,
    api_key: String,
}

impl RapidApiSkyscannerProvider {
    pub fn new(http: Arc<HttpClient>, api_key: String, rate: f64, per: f64) -> Self {
        Self {
            http,
            limiter: RateLimiter::new(rate, per),
            api_key,
        }
    }

    fn headers(&self) -> HashMap<String, String> {
        let mut h = HashMap::new();
        h.insert("X-RapidAPI-Key".to_string(), self.api_key.clone());
        h.insert("X-RapidAPI-Host".to_string(), HOST.to_string());
        h
    }
}

struct RapidApiSession {
    http: Arc<HttpClient>,
    headers: HashMap<String, String>,
    criteria: SearchCriteria,
}

#[async_trait]
impl PollingBackend for RapidApiSession {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn create_session(&self) -> Result<String, DomainError> {
        let dep = self.criteria.departure_date.format("%Y-%m-%d").to_string();
        let ret = self.criteria.return_date.map(|d| d.format("%Y-%m-%d").to_string());

        let mut query: Vec<(&str, &str)> = vec![
            ("originSkyId", self.criteria.origin.code()),
            ("destinationSkyId", self.criteria.destination.code()),
            ("date", dep.as_str()),
        ];
        if let Some(ret) = &ret {
            query.push(("returnDate", ret.as_str()));
        }

        let body = self.http.get_json(CREATE_URL, &query, &self.headers).await?;
        body.get("sessionId")
            .or_else(|| body.get("context").and_then(|c| c.get("sessionId")))
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| DomainError::provider(PROVIDER_NAME, "missing session id"))
    }

    async fn poll_once(&self, session_token: &str) -> Result<(Value, PollStatus), DomainError> {
        let query = [("sessionId", session_token)];
        let body = self.http.get_json(POLL_URL, &query, &self.headers).await?;

        let status = match body
            .get("context")
            .and_then(|c| c.get("status"))
            .and_then(|v| v.as_str())
        {
            Some("complete") => PollStatus::Complete,
            Some("incomplete") => PollStatus::InProgress,
            Some("failed") => PollStatus::Failed,
            _ => PollStatus::Unknown,
        };
        Ok((body, status))
    }
}

#[async_trait]
impl FlightProvider for RapidApiSkyscannerProvider {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Flight>, DomainError> {
        let session = RapidApiSession {
            http: self.http.clone(),
            headers: self.headers(),
            criteria: criteria.clone(),
        };
        run_provider_search(PROVIDER_NAME, &self.limiter, || async {
            let body = run_two_phase_poll(&session).await?;
            map_poll_response(&body, &session.criteria, PROVIDER_NAME)
        })
        .await
    }

    async fn is_available(&self) -> bool {
        self.limiter.try_acquire().await
    }
}
