//! HTTP client with exponential backoff and status-aware retry (MODULE D).
//! Grounded on the teacher's `reqwest::Client`-wrapping shape in
//! `client.rs` (a struct owning a pooled client, built once) merged with
//! the exact retry/backoff/user-agent algorithm from
//! `original_source/.../infrastructure/http/{async_http_client,retry_config}.py`.

use std::collections::HashMap;
use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;

use crate::error::DomainError;

/// Five realistic desktop-browser user-agent strings, rotated uniformly at
/// random per request — matches `DEFAULT_USER_AGENTS` in the original.
const DEFAULT_USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub min_wait: f64,
    pub max_wait: f64,
    pub multiplier: f64,
    pub retryable_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_wait: 2.0,
            max_wait: 10.0,
            multiplier: 1.0,
            retryable_status_codes: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Backoff for zero-based attempt `k`: `min(max_wait, min_wait * 2^k * multiplier)`.
    pub fn backoff_seconds(&self, attempt: u32) -> f64 {
        let raw = self.min_wait * 2f64.powi(attempt as i32) * self.multiplier;
        raw.min(self.max_wait)
    }

    fn is_retryable_status(&self, status: StatusCode) -> bool {
        self.retryable_status_codes.contains(&status.as_u16())
    }
}

pub struct HttpClient {
    client: Client,
    timeout: Duration,
    retry: RetryConfig,
}

impl HttpClient {
    pub fn new(timeout_seconds: f64, retry: RetryConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs_f64(timeout_seconds))
            .build()
            .expect("reqwest client configuration is always valid here");
        Self {
            client,
            timeout: Duration::from_secs_f64(timeout_seconds),
            retry,
        }
    }

    fn random_user_agent() -> &'static str {
        DEFAULT_USER_AGENTS
            .choose(&mut rand::thread_rng())
            .expect("table is non-empty")
    }

    pub async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &HashMap<String, String>,
    ) -> Result<Value, DomainError> {
        self.send_with_retry(Method::GET, url, Some(query), None, headers)
            .await
    }

    pub async fn post_json(
        &self,
        url: &str,
        body: &Value,
        headers: &HashMap<String, String>,
    ) -> Result<Value, DomainError> {
        self.send_with_retry(Method::POST, url, None, Some(body), headers)
            .await
    }

    async fn send_with_retry(
        &self,
        method: Method,
        url: &str,
        query: Option<&[(&str, &str)]>,
        json_body: Option<&Value>,
        headers: &HashMap<String, String>,
    ) -> Result<Value, DomainError> {
        let attempts = self.retry.max_retries + 1;
        let mut last_err: Option<DomainError> = None;

        for attempt in 0..attempts {
            let mut req = self
                .client
                .request(method.clone(), url)
                .timeout(self.timeout)
                .header("User-Agent", Self::random_user_agent());

            for (k, v) in headers {
                req = req.header(k.as_str(), v.as_str());
            }
            if let Some(q) = query {
                req = req.query(q);
            }
            if let Some(body) = json_body {
                req = req.json(body);
            }

            match req.send().await {
                Ok(response) => match self.handle_response(response, attempt).await {
                    Ok(value) => return Ok(value),
                    Err(RetryDecision::Retry(err)) => {
                        last_err = Some(err);
                    }
                    Err(RetryDecision::Fail(err)) => return Err(err),
                },
                Err(transport_err) => {
                    let err = DomainError::provider_from(
                        "http_client",
                        "transport error",
                        transport_err.to_string(),
                        "transport",
                    );
                    if attempt + 1 >= attempts {
                        return Err(err);
                    }
                    last_err = Some(err);
                }
            }

            if attempt + 1 < attempts {
                let wait = self.retry.backoff_seconds(attempt);
                tokio::time::sleep(Duration::from_secs_f64(wait)).await;
            }
        }

        Err(last_err.unwrap_or_else(|| {
            DomainError::provider("http_client", "request failed with no further detail")
        }))
    }

    async fn handle_response(
        &self,
        response: Response,
        _attempt: u32,
    ) -> Result<Value, RetryDecision> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<Value>()
                .await
                .map_err(|e| {
                    RetryDecision::Fail(DomainError::provider_from(
                        "http_client",
                        "failed to parse JSON response",
                        e.to_string(),
                        "parse",
                    ))
                });
        }

        if self.retry.is_retryable_status(status) {
            return Err(RetryDecision::Retry(DomainError::provider(
                "http_client",
                format!("retryable status {status}"),
            )));
        }

        Err(RetryDecision::Fail(DomainError::provider(
            "http_client",
            format!("non-retryable status {status}"),
        )))
    }

    /// Idempotent no-op: `reqwest::Client` has no explicit close handle, its
    /// connection pool is dropped with the last clone. Kept so the factory's
    /// shutdown path has a stable call site regardless of transport.
    pub async fn close(&self) {}
}

enum RetryDecision {
    Retry(DomainError),
    Fail(DomainError),
}
