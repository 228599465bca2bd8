//! Google Flights adapter (single-call shape, via SearchAPI.io), grounded
//! on `original_source/.../providers/google_flights/{constants,
//! google_flights_provider,response_mapper,searchapi_client,time_parser}.py`.
//!
//! This back-end's own per-segment `flights[].stops` already counts
//! intermediate landings within that segment; the mapper additionally adds
//! `(segment_count - 1)` to account for the layover *between* segments —
//! the literal rule from the original response mapper, kept here rather
//! than unified with the other adapters (see DESIGN.md's stops-counting
//! Open Question).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::{Airport, CabinClass, CabinClassType, Flight, Price, SearchCriteria};
use crate::error::DomainError;
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::providers::base::{run_provider_search, FlightProvider};
use crate::infrastructure::providers::normalize::{derive_airline_code, parse_12h_with_rollover, parse_iso8601};
use crate::infrastructure::rate_limiter::RateLimiter;

const PROVIDER_NAME: &str = "google_flights";
const SEARCHAPI_URL: &str = "https://www.searchapi.io/api/v1/search";

pub struct GoogleFlightsProvider {
    http: Arc<HttpClient>,
    limiter: RateLimiter,
    api_key: String,
}

impl GoogleFlightsProvider {
    pub fn new(http: Arc<HttpClient>, api_key: String, rate: f64, per: f64) -> Self {
        Self {
            http,
            limiter: RateLimiter::new(rate, per),
            api_key,
        }
    }

    fn cabin_code(class: CabinClassType) -> &'static str {
        match class {
            CabinClassType::Economy => "1",
            CabinClassType::PremiumEconomy => "2",
            CabinClassType::Business => "3",
            CabinClassType::First => "4",
        }
    }

    fn date_str(d: NaiveDate) -> String {
        d.format("%Y-%m-%d").to_string()
    }

    async fn perform_search(&self, criteria: &SearchCriteria) -> Result<Vec<Flight>, DomainError> {
        let trip_type = if criteria.is_round_trip() { "1" } else { "2" };
        let outbound = Self::date_str(criteria.departure_date);
        let inbound = criteria.return_date.map(Self::date_str);

        let mut query: Vec<(&str, &str)> = vec![
            ("engine", "google_flights"),
            ("api_key", self.api_key.as_str()),
            ("departure_id", criteria.origin.code()),
            ("arrival_id", criteria.destination.code()),
            ("outbound_date", outbound.as_str()),
            ("type", trip_type),
            ("travel_class", Self::cabin_code(criteria.cabin_class.class_type)),
            ("adults", "1"),
        ];
        if let Some(inbound) = &inbound {
            query.push(("return_date", inbound.as_str()));
        }

        let headers = HashMap::new();
        let body = self.http.get_json(SEARCHAPI_URL, &query, &headers).await?;
        map_response(&body, criteria)
    }
}

#[async_trait]
impl FlightProvider for GoogleFlightsProvider {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Flight>, DomainError> {
        run_provider_search(PROVIDER_NAME, &self.limiter, || self.perform_search(criteria)).await
    }

    async fn is_available(&self) -> bool {
        self.limiter.try_acquire().await
    }
}

fn map_response(body: &Value, criteria: &SearchCriteria) -> Result<Vec<Flight>, DomainError> {
    let mut raw_itineraries: Vec<&Value> = Vec::new();
    if let Some(best) = body.get("best_flights").and_then(|v| v.as_array()) {
        raw_itineraries.extend(best.iter());
    }
    if let Some(other) = body.get("other_flights").and_then(|v| v.as_array()) {
        raw_itineraries.extend(other.iter());
    }

    let mut flights = Vec::new();
    for (idx, itinerary) in raw_itineraries.iter().enumerate() {
        match map_one(itinerary, criteria, idx) {
            Ok(flight) => flights.push(flight),
            Err(_) => {
                tracing::warn!(provider = PROVIDER_NAME, "skipping unmappable itinerary");
                continue;
            }
        }
    }

    let effective_max_stops = criteria.effective_max_stops();
    flights.retain(|f| match effective_max_stops {
        Some(max) => f.stops() <= max,
        None => true,
    });
    flights.sort_by(|a, b| a.price().partial_cmp(&b.price()).unwrap_or(std::cmp::Ordering::Equal));
    Ok(flights)
}

fn map_one(itinerary: &Value, criteria: &SearchCriteria, idx: usize) -> Result<Flight, DomainError> {
    let segments = itinerary
        .get("flights")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    if segments.is_empty() {
        return Err(DomainError::provider(PROVIDER_NAME, "itinerary has no flight segments"));
    }
    let first = &segments[0];
    let last = segments.last().unwrap();

    let origin = Airport::from_code_or_placeholder(
        first
            .get("departure_airport")
            .and_then(|a| a.get("id"))
            .and_then(|v| v.as_str())
            .or(Some(criteria.origin.code())),
    );
    let destination = Airport::from_code_or_placeholder(
        last.get("arrival_airport")
            .and_then(|a| a.get("id"))
            .and_then(|v| v.as_str())
            .or(Some(criteria.destination.code())),
    );

    let dep_raw = first
        .get("departure_airport")
        .and_then(|a| a.get("time"))
        .and_then(|v| v.as_str());
    let arr_raw = last
        .get("arrival_airport")
        .and_then(|a| a.get("time"))
        .and_then(|v| v.as_str());

    // This back-end's wire shape almost never carries ISO-8601 timestamps in
    // practice; Google Flights reports times as "11:35 AM"-style 12-hour
    // strings against the outbound date, so a failed ISO-8601 parse falls
    // back to that format rather than treating the itinerary as unmappable.
    let departure_time = dep_raw
        .and_then(parse_iso8601)
        .or_else(|| dep_raw.and_then(|raw| parse_12h_with_rollover(raw, criteria.departure_date, None)))
        .ok_or_else(|| DomainError::provider(PROVIDER_NAME, "unparseable departure time"))?;
    let arrival_time = arr_raw
        .and_then(parse_iso8601)
        .or_else(|| {
            arr_raw.and_then(|raw| {
                parse_12h_with_rollover(raw, criteria.departure_date, Some(departure_time))
            })
        })
        .ok_or_else(|| DomainError::provider(PROVIDER_NAME, "unparseable arrival time"))?;

    // Literal double-count rule: per-segment stops plus inter-segment layovers.
    let per_segment_stops: u64 = segments
        .iter()
        .filter_map(|s| s.get("stops"))
        .filter_map(|v| v.as_u64())
        .sum();
    let inter_segment_layovers = segments.len().saturating_sub(1) as u64;
    let stops = (per_segment_stops + inter_segment_layovers).min(5) as u8;

    let price_amount = itinerary
        .get("price")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| DomainError::provider(PROVIDER_NAME, "missing price"))?;

    let airline_code = first.get("airline_code").and_then(|v| v.as_str());
    let airline_name = first.get("airline").and_then(|v| v.as_str());
    let flight_number = first.get("flight_number").and_then(|v| v.as_str());
    let airline = derive_airline_code(airline_code, flight_number, airline_name);

    let booking_token = itinerary.get("booking_token").and_then(|v| v.as_str());
    let back_end_id = booking_token
        .map(String::from)
        .unwrap_or_else(|| format!("idx{idx}"));

    Flight::new(
        PROVIDER_NAME,
        &back_end_id,
        origin,
        destination,
        departure_time,
        arrival_time,
        Price::new(price_amount, "USD")?,
        CabinClass::new(criteria.cabin_class.class_type),
        stops,
        airline,
        airline_name.map(String::from),
        first.get("airplane").and_then(|v| v.as_str()).map(String::from),
        flight_number.map(String::from),
        None,
    )
}
