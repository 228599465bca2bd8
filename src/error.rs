//! Domain error taxonomy.
//!
//! Every fallible operation in this crate returns a `Result<T, DomainError>`
//! (or a more specific variant wrapped into one at a layer boundary). No raw
//! back-end exception ever crosses a component boundary — HTTP failures are
//! classified into one of the variants below before they leave the provider
//! that observed them.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// An open context map attached to most errors, mirroring the original's
/// "extra fields" per error kind. Kept as a map rather than per-variant
/// struct fields beyond the ones the spec names explicitly, so adapters can
/// attach whatever diagnostic detail they have without widening the enum.
pub type ErrorContext = HashMap<String, Value>;

fn ctx() -> ErrorContext {
    HashMap::new()
}

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("validation error: {message}")]
    Validation {
        message: String,
        field: String,
        value: Option<String>,
    },

    #[error("provider error ({provider}): {message}")]
    Provider {
        message: String,
        provider: String,
        original_error: Option<String>,
        original_type: Option<String>,
    },

    #[error("rate limited by {provider}")]
    RateLimit {
        provider: String,
        retry_after: Option<f64>,
    },

    #[error("timeout contacting {provider}")]
    Timeout {
        provider: String,
        timeout_seconds: f64,
    },

    #[error("poll failed for {provider}")]
    PollFailed {
        provider: String,
        message: String,
    },

    #[error("cache error during {operation}")]
    Cache { operation: String, key: Option<String> },

    #[error("configuration error: {message}")]
    Configuration { message: String, setting: String },

    #[error("search failed: {message}")]
    Search {
        message: String,
        providers_failed: Vec<String>,
        original: Option<Box<DomainError>>,
    },

    #[error("cache management error during {operation}")]
    CacheManagement { operation: String, message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
            field: field.into(),
            value: None,
        }
    }

    pub fn validation_with_value(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl fmt::Display,
    ) -> Self {
        DomainError::Validation {
            message: message.into(),
            field: field.into(),
            value: Some(value.to_string()),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Provider {
            message: message.into(),
            provider: provider.into(),
            original_error: None,
            original_type: None,
        }
    }

    pub fn provider_from(
        provider: impl Into<String>,
        message: impl Into<String>,
        original_error: impl Into<String>,
        original_type: impl Into<String>,
    ) -> Self {
        DomainError::Provider {
            message: message.into(),
            provider: provider.into(),
            original_error: Some(original_error.into()),
            original_type: Some(original_type.into()),
        }
    }

    /// Whether this error (or the ProviderError it wraps) originated from a
    /// specific named provider. Used by the aggregator to report failed
    /// provider names without downcasting.
    pub fn provider_name(&self) -> Option<&str> {
        match self {
            DomainError::Provider { provider, .. }
            | DomainError::RateLimit { provider, .. }
            | DomainError::Timeout { provider, .. }
            | DomainError::PollFailed { provider, .. } => Some(provider),
            _ => None,
        }
    }

    /// Error taxonomy code, used by the presentation layer's formatter and
    /// matching the `code` field every JSON error response carries.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::Provider { .. } => "PROVIDER_ERROR",
            DomainError::RateLimit { .. } => "RATE_LIMIT_ERROR",
            DomainError::Timeout { .. } => "TIMEOUT_ERROR",
            DomainError::PollFailed { .. } => "PROVIDER_ERROR",
            DomainError::Cache { .. } => "CACHE_ERROR",
            DomainError::Configuration { .. } => "CONFIGURATION_ERROR",
            DomainError::Search { .. } => "SEARCH_ERROR",
            DomainError::CacheManagement { .. } => "CACHE_MANAGEMENT_ERROR",
        }
    }

    /// The open context map presented alongside `code`/`message` in the JSON
    /// error shape (see presentation::error_formatter).
    pub fn context(&self) -> ErrorContext {
        let mut c = ctx();
        match self {
            DomainError::Validation { field, value, .. } => {
                c.insert("field".into(), Value::String(field.clone()));
                if let Some(v) = value {
                    c.insert("value".into(), Value::String(v.clone()));
                }
            }
            DomainError::Provider {
                provider,
                original_error,
                original_type,
                ..
            } => {
                c.insert("provider".into(), Value::String(provider.clone()));
                if let Some(e) = original_error {
                    c.insert("original_error".into(), Value::String(e.clone()));
                }
                if let Some(t) = original_type {
                    c.insert("original_type".into(), Value::String(t.clone()));
                }
            }
            DomainError::RateLimit {
                provider,
                retry_after,
            } => {
                c.insert("provider".into(), Value::String(provider.clone()));
                if let Some(r) = retry_after {
                    c.insert(
                        "retry_after".into(),
                        serde_json::Number::from_f64(*r)
                            .map(Value::Number)
                            .unwrap_or(Value::Null),
                    );
                }
            }
            DomainError::Timeout {
                provider,
                timeout_seconds,
            } => {
                c.insert("provider".into(), Value::String(provider.clone()));
                c.insert(
                    "timeout_seconds".into(),
                    serde_json::Number::from_f64(*timeout_seconds)
                        .map(Value::Number)
                        .unwrap_or(Value::Null),
                );
            }
            DomainError::PollFailed { provider, message } => {
                c.insert("provider".into(), Value::String(provider.clone()));
                c.insert("details".into(), Value::String(message.clone()));
            }
            DomainError::Cache { operation, key } => {
                c.insert("operation".into(), Value::String(operation.clone()));
                if let Some(k) = key {
                    c.insert("key".into(), Value::String(k.clone()));
                }
            }
            DomainError::Configuration { setting, .. } => {
                c.insert("setting".into(), Value::String(setting.clone()));
            }
            DomainError::Search {
                providers_failed, ..
            } => {
                c.insert(
                    "providers_failed".into(),
                    Value::Array(
                        providers_failed
                            .iter()
                            .cloned()
                            .map(Value::String)
                            .collect(),
                    ),
                );
            }
            DomainError::CacheManagement { operation, .. } => {
                c.insert("operation".into(), Value::String(operation.clone()));
            }
        }
        c
    }
}

/// Alias used pervasively for fallible domain operations (MODULE A).
pub type DomainResult<T> = Result<T, DomainError>;
