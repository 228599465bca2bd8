//! Flight search use case (MODULE K), grounded on
//! `original_source/.../application/use_cases/search_flights_use_case.py`.
//! Orchestrates a single aggregator call, truncates the result to the
//! configured cap, and annotates it with summary metadata.

use std::time::Instant;

use crate::application::dtos::{flights_to_dtos, SearchResultDto, SearchSummary};
use crate::domain::SearchCriteria;
use crate::error::DomainError;
use crate::infrastructure::providers::Aggregator;

pub struct SearchUseCase<'a> {
    aggregator: &'a Aggregator,
    max_results: usize,
}

impl<'a> SearchUseCase<'a> {
    pub fn new(aggregator: &'a Aggregator, max_results: usize) -> Self {
        Self {
            aggregator,
            max_results,
        }
    }

    pub async fn execute(&self, criteria: &SearchCriteria) -> Result<SearchResultDto, DomainError> {
        let started = Instant::now();
        let (mut flights, providers_used) = self.aggregator.search_with_provenance(criteria).await?;

        flights.truncate(self.max_results);

        Ok(SearchResultDto {
            flights: flights_to_dtos(&flights),
            summary: SearchSummary {
                count: flights.len(),
                providers_used,
                elapsed_ms: started.elapsed().as_millis(),
                // The aggregator never reads from the cache itself — a cache
                // hit happens one layer down, inside a `CachingProvider` — so
                // this use case has no way to know and always reports false,
                // matching the original's literal behavior (see DESIGN.md).
                cache_hit: false,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Airport, CabinClass, CabinClassType, Flight, PassengerConfig, Price};
    use crate::infrastructure::providers::base::FlightProvider;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::sync::Arc;

    struct StaticProvider {
        name: &'static str,
        flights: Vec<Flight>,
    }

    #[async_trait]
    impl FlightProvider for StaticProvider {
        fn provider_name(&self) -> &str {
            self.name
        }

        async fn search(&self, _criteria: &SearchCriteria) -> Result<Vec<Flight>, DomainError> {
            Ok(self.flights.clone())
        }
    }

    fn flight(id: &str, price: f64) -> Flight {
        Flight::new(
            "kiwi",
            id,
            Airport::new("JFK").unwrap(),
            Airport::new("LAX").unwrap(),
            Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 6, 1, 15, 0, 0).unwrap(),
            Price::new(price, "USD").unwrap(),
            CabinClass::new(CabinClassType::Economy),
            0,
            "DL".into(),
            None,
            None,
            None,
            None,
        )
        .unwrap()
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
    async fn truncates_to_max_results() {
        let flights = vec![flight("1", 100.0), flight("2", 200.0), flight("3", 300.0)];
        let aggregator = Aggregator::new(vec![Arc::new(StaticProvider {
            name: "kiwi",
            flights,
        })]);
        let use_case = SearchUseCase::new(&aggregator, 2);
        let result = use_case.execute(&criteria()).await.unwrap();
        assert_eq!(result.flights.len(), 2);
        assert_eq!(result.summary.count, 2);
    }

    #[tokio::test]
    async fn cache_hit_is_always_false_at_this_layer() {
        let aggregator = Aggregator::new(vec![Arc::new(StaticProvider {
            name: "kiwi",
            flights: vec![flight("1", 100.0)],
        })]);
        let use_case = SearchUseCase::new(&aggregator, 50);
        let result = use_case.execute(&criteria()).await.unwrap();
        assert!(!result.summary.cache_hit);
    }
}
