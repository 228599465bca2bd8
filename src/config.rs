//! Application settings, loaded from `FLIGHT_FINDER_*` environment
//! variables (MODULE M — ambient stack). Grounded on
//! `original_source/.../config/settings.py`, reimplemented without a
//! settings-framework dependency since the teacher repo parses its own
//! configuration by hand rather than pulling one in.

use std::env;

use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Console,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub skyscanner_api_key: String,
    pub rapidapi_skyscanner_api_key: String,
    pub searchapi_key: String,
    pub kiwi_api_key: String,

    pub cache_enabled: bool,
    pub cache_ttl_seconds: u64,
    pub cache_max_size: usize,

    pub http_timeout_seconds: f64,
    pub http_max_retries: u32,

    pub log_level: String,
    pub log_format: LogFormat,

    pub max_search_results: usize,
    pub default_currency: String,

    pub server_name: String,
    pub server_version: String,
}

impl Settings {
    /// Loads settings from the process environment, applying the same
    /// defaults and bounds as the original `pydantic-settings` model.
    pub fn from_env() -> Result<Self, DomainError> {
        let s = Self {
            skyscanner_api_key: env_str("FLIGHT_FINDER_SKYSCANNER_API_KEY", ""),
            rapidapi_skyscanner_api_key: env_str("FLIGHT_FINDER_RAPIDAPI_SKYSCANNER_API_KEY", ""),
            searchapi_key: env_str("FLIGHT_FINDER_SEARCHAPI_KEY", ""),
            kiwi_api_key: env_str("FLIGHT_FINDER_KIWI_API_KEY", ""),

            cache_enabled: env_bool("FLIGHT_FINDER_CACHE_ENABLED", true),
            cache_ttl_seconds: env_bounded_u64("FLIGHT_FINDER_CACHE_TTL_SECONDS", 300, 0, 3600)?,
            cache_max_size: env_bounded_usize("FLIGHT_FINDER_CACHE_MAX_SIZE", 1000, 100, 10000)?,

            http_timeout_seconds: env_bounded_f64(
                "FLIGHT_FINDER_HTTP_TIMEOUT_SECONDS",
                30.0,
                5.0,
                120.0,
            )?,
            http_max_retries: env_bounded_u64("FLIGHT_FINDER_HTTP_MAX_RETRIES", 3, 0, 10)? as u32,

            log_level: env_str("FLIGHT_FINDER_LOG_LEVEL", "INFO"),
            log_format: match env_str("FLIGHT_FINDER_LOG_FORMAT", "console").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Console,
            },

            max_search_results: env_bounded_usize("FLIGHT_FINDER_MAX_SEARCH_RESULTS", 50, 10, 200)?,
            default_currency: env_str("FLIGHT_FINDER_DEFAULT_CURRENCY", "USD").to_uppercase(),

            server_name: env_str("FLIGHT_FINDER_SERVER_NAME", "flight-finder-mcp"),
            server_version: env_str("FLIGHT_FINDER_SERVER_VERSION", "0.1.0"),
        };

        if s.default_currency.len() != 3 {
            return Err(DomainError::Configuration {
                message: "default currency must be exactly 3 characters".into(),
                setting: "default_currency".into(),
            });
        }

        Ok(s)
    }

    pub fn has_skyscanner_key(&self) -> bool {
        !self.skyscanner_api_key.is_empty()
    }
    pub fn has_rapidapi_skyscanner_key(&self) -> bool {
        !self.rapidapi_skyscanner_api_key.is_empty()
    }
    pub fn has_searchapi_key(&self) -> bool {
        !self.searchapi_key.is_empty()
    }
    pub fn has_kiwi_key(&self) -> bool {
        !self.kiwi_api_key.is_empty()
    }

    pub fn has_any_provider_key(&self) -> bool {
        self.has_skyscanner_key()
            || self.has_rapidapi_skyscanner_key()
            || self.has_searchapi_key()
            || self.has_kiwi_key()
    }
}

fn env_str(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

fn env_bounded_u64(key: &str, default: u64, min: u64, max: u64) -> Result<u64, DomainError> {
    let v = match env::var(key) {
        Ok(raw) => raw.parse::<u64>().map_err(|_| DomainError::Configuration {
            message: format!("{key} must be an integer"),
            setting: key.to_string(),
        })?,
        Err(_) => default,
    };
    bounds_check(key, v, min, max)
}

fn env_bounded_usize(key: &str, default: usize, min: usize, max: usize) -> Result<usize, DomainError> {
    let v = match env::var(key) {
        Ok(raw) => raw.parse::<usize>().map_err(|_| DomainError::Configuration {
            message: format!("{key} must be an integer"),
            setting: key.to_string(),
        })?,
        Err(_) => default,
    };
    bounds_check(key, v, min, max)
}

fn env_bounded_f64(key: &str, default: f64, min: f64, max: f64) -> Result<f64, DomainError> {
    let v = match env::var(key) {
        Ok(raw) => raw.parse::<f64>().map_err(|_| DomainError::Configuration {
            message: format!("{key} must be a number"),
            setting: key.to_string(),
        })?,
        Err(_) => default,
    };
    if v < min || v > max {
        return Err(DomainError::Configuration {
            message: format!("{key} must be between {min} and {max}"),
            setting: key.to_string(),
        });
    }
    Ok(v)
}

fn bounds_check<T: PartialOrd + std::fmt::Display>(
    key: &str,
    v: T,
    min: T,
    max: T,
) -> Result<T, DomainError> {
    if v < min || v > max {
        return Err(DomainError::Configuration {
            message: format!("{key} must be between {min} and {max}"),
            setting: key.to_string(),
        });
    }
    Ok(v)
}
