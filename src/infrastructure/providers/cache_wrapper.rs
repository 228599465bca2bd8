//! Caching provider decorator (MODULE H), grounded on
//! `original_source/.../infrastructure/providers/cached_provider.py`. Wraps
//! any [`FlightProvider`] (a concrete adapter or the aggregator itself),
//! computing a canonical cache key over the full search criteria so two
//! logically-identical searches share a cache entry regardless of argument
//! order or representation quirks.

use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::{Flight, SearchCriteria};
use crate::error::DomainError;
use crate::infrastructure::cache::InMemoryCache;
use crate::infrastructure::providers::base::FlightProvider;

pub struct CachingProvider {
    inner: Arc<dyn FlightProvider>,
    cache: Arc<InMemoryCache>,
    ttl_seconds: u64,
}

impl CachingProvider {
    pub fn new(inner: Arc<dyn FlightProvider>, cache: Arc<InMemoryCache>, ttl_seconds: u64) -> Self {
        Self {
            inner,
            cache,
            ttl_seconds,
        }
    }
}

/// First 16 hex characters of a SHA-256 digest over the provider name and
/// every field of `criteria` that affects the result set, `:`-joined.
/// Deliberately excludes `non_stop_only` as a separate field since it folds
/// into `effective_max_stops()` already.
pub fn cache_key(provider_name: &str, criteria: &SearchCriteria) -> String {
    let raw = format!(
        "{provider}:{origin}:{destination}:{departure}:{return_date}:{adults}:{children}:{infants}:{cabin}:{max_stops:?}:{flexible}:{flex_days:?}",
        provider = provider_name,
        origin = criteria.origin.code(),
        destination = criteria.destination.code(),
        departure = criteria.departure_date,
        return_date = criteria
            .return_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "none".to_string()),
        adults = criteria.passengers.adults(),
        children = criteria.passengers.children(),
        infants = criteria.passengers.infants(),
        cabin = criteria.cabin_class.class_type.as_str(),
        max_stops = criteria.effective_max_stops(),
        flexible = criteria.flexible_dates,
        flex_days = criteria.flexibility_days,
    );
    let digest = Sha256::digest(raw.as_bytes());
    hex_prefix(&digest, 16)
}

fn hex_prefix(digest: &[u8], chars: usize) -> String {
    digest
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>()
        .chars()
        .take(chars)
        .collect()
}

#[async_trait]
impl FlightProvider for CachingProvider {
    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Flight>, DomainError> {
        let key = cache_key(self.inner.provider_name(), criteria);

        if let Some(cached) = self.cache.get(&key).await {
            if let Ok(flights) = serde_json::from_value::<Vec<Flight>>(cached) {
                return Ok(flights);
            }
        }

        let flights = self.inner.search(criteria).await?;
        if let Ok(value) = serde_json::to_value(&flights) {
            self.cache.set(&key, value, Some(self.ttl_seconds)).await;
        }
        Ok(flights)
    }

    async fn is_available(&self) -> bool {
        self.inner.is_available().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Airport, CabinClass, CabinClassType, PassengerConfig};
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingProvider {
        calls: AtomicU32,
    }

    #[async_trait]
    impl FlightProvider for CountingProvider {
        fn provider_name(&self) -> &str {
            "counting"
        }

        async fn search(&self, _criteria: &SearchCriteria) -> Result<Vec<Flight>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    fn criteria() -> SearchCriteria {
        SearchCriteria::new(
            Airport::new("JFK").unwrap(),
            Airport::new("LAX").unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            None,
            PassengerConfig::default(),
            CabinClass::new(CabinClassType::Economy),
            None,
            false,
            false,
            None,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn second_identical_search_is_served_from_cache() {
        let inner = Arc::new(CountingProvider {
            calls: AtomicU32::new(0),
        });
        let cache = Arc::new(InMemoryCache::new(10, 300));
        let wrapper = CachingProvider::new(inner.clone(), cache, 300);

        wrapper.search(&criteria()).await.unwrap();
        wrapper.search(&criteria()).await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cache_key_is_stable_and_16_hex_chars() {
        let k1 = cache_key("kiwi", &criteria());
        let k2 = cache_key("kiwi", &criteria());
        assert_eq!(k1, k2);
        assert_eq!(k1.len(), 16);
        assert!(k1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn cache_key_differs_by_provider() {
        assert_ne!(cache_key("kiwi", &criteria()), cache_key("skyscanner", &criteria()));
    }
}
