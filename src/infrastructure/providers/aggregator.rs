//! Multi-provider aggregator (MODULE I), grounded on
//! `original_source/.../infrastructure/providers/aggregator.py`. Fans a
//! single search out to every registered back-end concurrently, tolerates
//! partial failure, deduplicates near-identical itineraries surfaced by more
//! than one back-end, and returns a stable price-ascending list.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use crate::domain::{Flight, SearchCriteria};
use crate::error::DomainError;
use crate::infrastructure::providers::base::FlightProvider;

pub const PROVIDER_NAME: &str = "aggregator";

pub struct Aggregator {
    providers: Vec<Arc<dyn FlightProvider>>,
}

impl Aggregator {
    pub fn new(providers: Vec<Arc<dyn FlightProvider>>) -> Self {
        Self { providers }
    }

    /// Fans out to every provider concurrently. Returns `Ok` with whatever
    /// succeeded as long as at least one back-end returned results or an
    /// empty-but-successful list; fails only when every back-end errored.
    async fn fan_out(&self, criteria: &SearchCriteria) -> Result<(Vec<Flight>, Vec<String>), DomainError> {
        let futures = self.providers.iter().map(|p| {
            let criteria = criteria.clone();
            async move { (p.provider_name().to_string(), p.search(&criteria).await) }
        });

        let results = join_all(futures).await;

        let mut flights = Vec::new();
        let mut providers_used = Vec::new();
        let mut errors = Vec::new();

        for (name, result) in results {
            match result {
                Ok(mut found) => {
                    providers_used.push(name);
                    flights.append(&mut found);
                }
                Err(err) => errors.push((name, err)),
            }
        }

        if flights.is_empty() && providers_used.is_empty() && !errors.is_empty() {
            let providers_failed: Vec<String> = errors.iter().map(|(n, _)| n.clone()).collect();
            let (_, first_err) = errors.into_iter().next().unwrap();
            return Err(DomainError::Search {
                message: "all providers failed".to_string(),
                providers_failed,
                original: Some(Box::new(first_err)),
            });
        }

        for (name, err) in &errors {
            tracing::warn!(provider = name.as_str(), error = %err, "provider failed during aggregation");
        }

        Ok((flights, providers_used))
    }
}

#[async_trait]
impl FlightProvider for Aggregator {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Flight>, DomainError> {
        let (flights, _providers_used) = self.fan_out(criteria).await?;
        let deduped = deduplicate(flights);
        Ok(sort_by_price(deduped))
    }
}

impl Aggregator {
    /// Same as [`FlightProvider::search`] but also returns which back-ends
    /// contributed at least one result, for the search use case's summary
    /// metadata.
    pub async fn search_with_provenance(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<(Vec<Flight>, Vec<String>), DomainError> {
        let (flights, providers_used) = self.fan_out(criteria).await?;
        let deduped = deduplicate(flights);
        Ok((sort_by_price(deduped), providers_used))
    }
}

/// Two-stage dedup: bucket by `(origin, destination, airline)` so only
/// itineraries that could plausibly be the same flight are ever compared,
/// then within a bucket keep the first-seen flight and drop any later one
/// whose departure/arrival are within 30 minutes and whose price is within
/// 5% of the running mean for that group.
///
/// Output order is first-seen order over the input, independent of
/// `HashMap`'s randomized iteration order — only bucket *membership* goes
/// through the map, the kept flights themselves accumulate into a plain
/// `Vec` that is returned as-is, so `sort_by_price`'s stable tie-break on
/// equal price stays deterministic run to run.
fn deduplicate(flights: Vec<Flight>) -> Vec<Flight> {
    let mut buckets: HashMap<(String, String, String), Vec<usize>> = HashMap::new();
    let mut kept: Vec<Flight> = Vec::new();

    for flight in flights {
        let key = (
            flight.origin().code().to_string(),
            flight.destination().code().to_string(),
            flight.airline().to_string(),
        );
        let bucket = buckets.entry(key).or_default();

        let is_duplicate = bucket.iter().any(|&i| is_similar(&kept[i], &flight));
        if !is_duplicate {
            bucket.push(kept.len());
            kept.push(flight);
        }
    }

    kept
}

fn is_similar(a: &Flight, b: &Flight) -> bool {
    let dep_delta = (a.departure_time() - b.departure_time()).num_minutes().abs();
    let arr_delta = (a.arrival_time() - b.arrival_time()).num_minutes().abs();
    if dep_delta > 30 || arr_delta > 30 {
        return false;
    }

    match a.price().mean_with(&b.price()) {
        Ok(mean) if mean > 0.0 => {
            let diff = a.price().diff_with(&b.price()).unwrap_or(f64::MAX).abs();
            diff / mean <= 0.05
        }
        _ => false,
    }
}

fn sort_by_price(mut flights: Vec<Flight>) -> Vec<Flight> {
    flights.sort_by(|a, b| a.price().partial_cmp(&b.price()).unwrap_or(std::cmp::Ordering::Equal));
    flights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Airport, CabinClass, CabinClassType, PassengerConfig, Price};
    use chrono::{TimeZone, Utc};

    fn flight(provider: &str, id: &str, price: f64, dep_hour: u32) -> Flight {
        flight_with_airline(provider, id, price, dep_hour, "DL")
    }

    fn flight_with_airline(provider: &str, id: &str, price: f64, dep_hour: u32, airline: &str) -> Flight {
        Flight::new(
            provider,
            id,
            Airport::new("JFK").unwrap(),
            Airport::new("LAX").unwrap(),
            Utc.with_ymd_and_hms(2026, 6, 1, dep_hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 6, 1, dep_hour + 5, 0, 0).unwrap(),
            Price::new(price, "USD").unwrap(),
            CabinClass::new(CabinClassType::Economy),
            0,
            airline.into(),
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
            chrono::NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            None,
            PassengerConfig::default(),
            CabinClass::new(CabinClassType::Economy),
            None,
            false,
            false,
            None,
            chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        )
        .unwrap()
    }

    struct StaticProvider {
        name: &'static str,
        result: Result<Vec<Flight>, DomainError>,
    }

    #[async_trait]
    impl FlightProvider for StaticProvider {
        fn provider_name(&self) -> &str {
            self.name
        }

        async fn search(&self, _criteria: &SearchCriteria) -> Result<Vec<Flight>, DomainError> {
            match &self.result {
                Ok(flights) => Ok(flights.clone()),
                Err(_) => Err(DomainError::provider(self.name, "boom")),
            }
        }
    }

    #[tokio::test]
    async fn tolerates_partial_provider_failure() {
        let agg = Aggregator::new(vec![
            Arc::new(StaticProvider {
                name: "good",
                result: Ok(vec![flight("good", "1", 100.0, 10)]),
            }),
            Arc::new(StaticProvider {
                name: "bad",
                result: Err(DomainError::provider("bad", "down")),
            }),
        ]);
        let result = agg.search(&criteria()).await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn fails_only_when_every_provider_fails() {
        let agg = Aggregator::new(vec![Arc::new(StaticProvider {
            name: "bad",
            result: Err(DomainError::provider("bad", "down")),
        })]);
        let result = agg.search(&criteria()).await;
        assert!(matches!(result, Err(DomainError::Search { .. })));
    }

    #[tokio::test]
    async fn deduplicates_near_identical_cross_provider_flights() {
        let agg = Aggregator::new(vec![
            Arc::new(StaticProvider {
                name: "kiwi",
                result: Ok(vec![flight("kiwi", "1", 100.0, 10)]),
            }),
            Arc::new(StaticProvider {
                name: "skyscanner",
                result: Ok(vec![flight("skyscanner", "2", 102.0, 10)]),
            }),
        ]);
        let result = agg.search(&criteria()).await.unwrap();
        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn keeps_distinct_flights_with_different_departure_times() {
        let agg = Aggregator::new(vec![
            Arc::new(StaticProvider {
                name: "kiwi",
                result: Ok(vec![flight("kiwi", "1", 100.0, 10)]),
            }),
            Arc::new(StaticProvider {
                name: "skyscanner",
                result: Ok(vec![flight("skyscanner", "2", 100.0, 18)]),
            }),
        ]);
        let result = agg.search(&criteria()).await.unwrap();
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn equal_price_flights_from_distinct_buckets_keep_first_seen_order() {
        // Three distinct (origin/destination/airline) buckets, all tied at
        // the same price: a stable sort must preserve the provider's
        // registration/fan-out order rather than whatever order a HashMap
        // happened to iterate its buckets in.
        let agg = Aggregator::new(vec![Arc::new(StaticProvider {
            name: "kiwi",
            result: Ok(vec![
                flight_with_airline("kiwi", "dl", 100.0, 10, "DL"),
                flight_with_airline("kiwi", "aa", 100.0, 10, "AA"),
                flight_with_airline("kiwi", "ua", 100.0, 10, "UA"),
            ]),
        })]);
        let result = agg.search(&criteria()).await.unwrap();
        let ids: Vec<&str> = result.iter().map(|f| f.id()).collect();
        assert_eq!(ids, vec!["kiwi_dl", "kiwi_aa", "kiwi_ua"]);
    }

    #[tokio::test]
    async fn results_are_sorted_by_price_ascending() {
        let agg = Aggregator::new(vec![Arc::new(StaticProvider {
            name: "kiwi",
            result: Ok(vec![
                flight("kiwi", "1", 300.0, 10),
                flight("kiwi", "2", 100.0, 18),
            ]),
        })]);
        let result = agg.search(&criteria()).await.unwrap();
        assert_eq!(result[0].price().amount(), 100.0);
        assert_eq!(result[1].price().amount(), 300.0);
    }
}
