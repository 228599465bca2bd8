//! Provider factory (MODULE J), grounded on
//! `original_source/.../infrastructure/providers/provider_factory.py`.
//! Reads [`Settings`], constructs every back-end adapter whose API key is
//! present, wraps each in the cache decorator (sharing one
//! [`InMemoryCache`]), and registers it at the per-backend priority table
//! from spec §4.9.

use std::sync::Arc;

use crate::config::Settings;
use crate::infrastructure::cache::InMemoryCache;
use crate::infrastructure::http_client::{HttpClient, RetryConfig};
use crate::infrastructure::providers::aggregator::Aggregator;
use crate::infrastructure::providers::base::FlightProvider;
use crate::infrastructure::providers::cache_wrapper::CachingProvider;
use crate::infrastructure::providers::google_flights::GoogleFlightsProvider;
use crate::infrastructure::providers::kiwi::KiwiProvider;
use crate::infrastructure::providers::rapidapi_skyscanner::RapidApiSkyscannerProvider;
use crate::infrastructure::providers::registry::ProviderRegistry;
use crate::infrastructure::providers::skyscanner::SkyscannerProvider;

/// `(rate, per, priority)` defaults per back-end, from spec §4.9.
const SKYSCANNER_DEFAULTS: (f64, f64, u32) = (1.0, 3.0, 90);
const GOOGLE_FLIGHTS_DEFAULTS: (f64, f64, u32) = (1.0, 2.0, 80);
const RAPIDAPI_SKYSCANNER_DEFAULTS: (f64, f64, u32) = (1.0, 3.0, 70);
const KIWI_DEFAULTS: (f64, f64, u32) = (1.0, 2.0, 75);

pub struct ProviderFactory {
    http: Arc<HttpClient>,
    cache: Arc<InMemoryCache>,
    registry: Arc<ProviderRegistry>,
    cache_enabled: bool,
    cache_ttl_seconds: u64,
}

impl ProviderFactory {
    pub fn new(settings: &Settings) -> Self {
        let retry = RetryConfig {
            max_retries: settings.http_max_retries,
            ..RetryConfig::default()
        };
        let http = Arc::new(HttpClient::new(settings.http_timeout_seconds, retry));
        let cache = Arc::new(InMemoryCache::new(settings.cache_max_size, settings.cache_ttl_seconds));
        Self {
            http,
            cache,
            registry: Arc::new(ProviderRegistry::new()),
            cache_enabled: settings.cache_enabled,
            cache_ttl_seconds: settings.cache_ttl_seconds,
        }
    }

    fn maybe_cached(&self, provider: Arc<dyn FlightProvider>) -> Arc<dyn FlightProvider> {
        if self.cache_enabled {
            Arc::new(CachingProvider::new(provider, self.cache.clone(), self.cache_ttl_seconds))
        } else {
            provider
        }
    }

    /// Builds and registers every back-end for which `settings` carries an
    /// API key. A deployment with no keys configured registers nothing; the
    /// aggregator built from it would then fail every search (caught by the
    /// "all providers failed" path in [`Aggregator`]).
    pub async fn build_registry(&self, settings: &Settings) -> Arc<ProviderRegistry> {
        if settings.has_skyscanner_key() {
            let (rate, per, priority) = SKYSCANNER_DEFAULTS;
            let provider = Arc::new(SkyscannerProvider::new(
                self.http.clone(),
                settings.skyscanner_api_key.clone(),
                rate,
                per,
            ));
            self.registry.register(self.maybe_cached(provider), priority).await;
        }

        if settings.has_searchapi_key() {
            let (rate, per, priority) = GOOGLE_FLIGHTS_DEFAULTS;
            let provider = Arc::new(GoogleFlightsProvider::new(
                self.http.clone(),
                settings.searchapi_key.clone(),
                rate,
                per,
            ));
            self.registry.register(self.maybe_cached(provider), priority).await;
        }

        if settings.has_rapidapi_skyscanner_key() {
            let (rate, per, priority) = RAPIDAPI_SKYSCANNER_DEFAULTS;
            let provider = Arc::new(RapidApiSkyscannerProvider::new(
                self.http.clone(),
                settings.rapidapi_skyscanner_api_key.clone(),
                rate,
                per,
            ));
            self.registry.register(self.maybe_cached(provider), priority).await;
        }

        if settings.has_kiwi_key() {
            let (rate, per, priority) = KIWI_DEFAULTS;
            let provider = Arc::new(KiwiProvider::new(
                self.http.clone(),
                settings.kiwi_api_key.clone(),
                rate,
                per,
            ));
            self.registry.register(self.maybe_cached(provider), priority).await;
        }

        self.registry.clone()
    }

    /// Providers are visited in registration order (skyscanner, google_flights,
    /// rapidapi_skyscanner, kiwi when all four keys are present) — `priority`
    /// only matters when a caller asks the registry for a truncated top-N.
    pub async fn create_aggregator(&self) -> Aggregator {
        Aggregator::new(self.registry.in_registration_order().await)
    }

    pub fn cache(&self) -> Arc<InMemoryCache> {
        self.cache.clone()
    }

    pub async fn close(&self) {
        self.http.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;

    fn settings_with(key_field: &str) -> Settings {
        let mut s = Settings {
            skyscanner_api_key: String::new(),
            rapidapi_skyscanner_api_key: String::new(),
            searchapi_key: String::new(),
            kiwi_api_key: String::new(),
            cache_enabled: true,
            cache_ttl_seconds: 300,
            cache_max_size: 1000,
            http_timeout_seconds: 30.0,
            http_max_retries: 3,
            log_level: "INFO".into(),
            log_format: LogFormat::Console,
            max_search_results: 50,
            default_currency: "USD".into(),
            server_name: "flight-finder-mcp".into(),
            server_version: "0.1.0".into(),
        };
        match key_field {
            "kiwi" => s.kiwi_api_key = "test-key".into(),
            "skyscanner" => s.skyscanner_api_key = "test-key".into(),
            _ => {}
        }
        s
    }

    #[tokio::test]
    async fn registers_only_configured_backends() {
        let settings = settings_with("kiwi");
        let factory = ProviderFactory::new(&settings);
        let registry = factory.build_registry(&settings).await;
        let status = registry.status().await;
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].name, "kiwi");
    }

    #[tokio::test]
    async fn no_keys_registers_nothing() {
        let settings = settings_with("none");
        let factory = ProviderFactory::new(&settings);
        let registry = factory.build_registry(&settings).await;
        assert!(registry.status().await.is_empty());
    }

    #[tokio::test]
    async fn aggregator_is_built_in_registration_not_priority_order() {
        let mut settings = settings_with("none");
        settings.kiwi_api_key = "test-key".into();
        settings.skyscanner_api_key = "test-key".into();
        let factory = ProviderFactory::new(&settings);
        let registry = factory.build_registry(&settings).await;

        // skyscanner is registered before kiwi in `build_registry`, even
        // though kiwi's default priority (75) is higher than rapidapi's but
        // lower than skyscanner's (90) — registration order, not priority
        // order, is what aggregator construction follows.
        let ordered = registry.in_registration_order().await;
        assert_eq!(ordered[0].provider_name(), "skyscanner");
        assert_eq!(ordered[1].provider_name(), "kiwi");
    }
}
