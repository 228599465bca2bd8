//! Kiwi adapter (single-call shape), grounded on
//! `original_source/.../providers/kiwi/{api_client,constants,response_mapper}.py`.
//! Kiwi is fronted through RapidAPI's "flights-scraper-real-time" product;
//! one-way and round-trip searches hit distinct endpoints on the same host.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Airport, CabinClass, CabinClassType, Flight, Price, SearchCriteria};
use crate::error::DomainError;
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::providers::base::{run_provider_search, FlightProvider};
use crate::infrastructure::providers::normalize::{derive_airline_code, parse_iso8601};
use crate::infrastructure::rate_limiter::RateLimiter;

const PROVIDER_NAME: &str = "kiwi";
const HOST: &str = "kiwi-com-cheap-flights.p.rapidapi.com";
const ONEWAY_PATH: &str = "https://kiwi-com-cheap-flights.p.rapidapi.com/one-way";
const RETURN_PATH: &str = "https://kiwi-com-cheap-flights.p.rapidapi.com/round-trip";

pub struct KiwiProvider {
    http: Arc<HttpClient>,
    limiter: RateLimiter,
    api_key: String,
}

impl KiwiProvider {
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

    fn cabin_code(class: CabinClassType) -> &'static str {
        match class {
            CabinClassType::Economy => "ECONOMY",
            CabinClassType::PremiumEconomy => "PREMIUM_ECONOMY",
            CabinClassType::Business => "BUSINESS",
            CabinClassType::First => "FIRST_CLASS",
        }
    }

    async fn perform_search(&self, criteria: &SearchCriteria) -> Result<Vec<Flight>, DomainError> {
        let url = if criteria.is_round_trip() {
            RETURN_PATH
        } else {
            ONEWAY_PATH
        };

        let dep = criteria.departure_date.format("%Y-%m-%d").to_string();
        let ret = criteria.return_date.map(|d| d.format("%Y-%m-%d").to_string());

        let mut query: Vec<(&str, &str)> = vec![
            ("source", criteria.origin.code()),
            ("destination", criteria.destination.code()),
            ("outboundDate", dep.as_str()),
            ("adults", "1"),
            ("cabinClass", Self::cabin_code(criteria.cabin_class.class_type)),
            ("currency", "usd"),
        ];
        if let Some(ret) = &ret {
            query.push(("inboundDate", ret.as_str()));
        }

        let body = self.http.get_json(url, &query, &self.headers()).await?;
        map_response(&body, criteria)
    }
}

#[async_trait]
impl FlightProvider for KiwiProvider {
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
    let itineraries = body
        .get("data")
        .and_then(|d| d.get("itineraries"))
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    let mut flights = Vec::new();
    for itinerary in &itineraries {
        match map_one(itinerary, criteria) {
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

fn map_one(itinerary: &Value, criteria: &SearchCriteria) -> Result<Flight, DomainError> {
    let id = itinerary
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DomainError::provider(PROVIDER_NAME, "missing itinerary id"))?;

    let segments = itinerary
        .get("sector")
        .and_then(|s| s.get("segments"))
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    if segments.is_empty() {
        return Err(DomainError::provider(PROVIDER_NAME, "itinerary has no segments"));
    }
    let first = &segments[0];
    let last = segments.last().unwrap();

    let origin_code = first
        .get("source")
        .and_then(|s| s.get("station"))
        .and_then(|s| s.get("code"))
        .and_then(|v| v.as_str());
    let dest_code = last
        .get("destination")
        .and_then(|s| s.get("station"))
        .and_then(|s| s.get("code"))
        .and_then(|v| v.as_str());

    let origin = Airport::from_code_or_placeholder(origin_code.or(Some(criteria.origin.code())));
    let destination =
        Airport::from_code_or_placeholder(dest_code.or(Some(criteria.destination.code())));

    let dep_raw = first
        .get("source")
        .and_then(|s| s.get("localTime"))
        .and_then(|v| v.as_str())
        .or_else(|| first.get("source").and_then(|s| s.get("utcTime")).and_then(|v| v.as_str()));
    let arr_raw = last
        .get("destination")
        .and_then(|s| s.get("localTime"))
        .and_then(|v| v.as_str())
        .or_else(|| last.get("destination").and_then(|s| s.get("utcTime")).and_then(|v| v.as_str()));

    let departure_time = dep_raw
        .and_then(parse_iso8601)
        .ok_or_else(|| DomainError::provider(PROVIDER_NAME, "unparseable departure time"))?;
    let arrival_time = arr_raw
        .and_then(parse_iso8601)
        .ok_or_else(|| DomainError::provider(PROVIDER_NAME, "unparseable arrival time"))?;

    // Kiwi's own stops rule: segment count minus one (no separate layover field).
    let stops = (segments.len() as u8).saturating_sub(1).min(5);

    let price_value = itinerary
        .get("price")
        .and_then(|p| p.get("amount"))
        .ok_or_else(|| DomainError::provider(PROVIDER_NAME, "missing price"))?;
    let price_amount: f64 = price_value
        .as_f64()
        .or_else(|| price_value.as_str().and_then(|s| s.parse().ok()))
        .ok_or_else(|| DomainError::provider(PROVIDER_NAME, "unparseable price"))?;

    let airline_code = first
        .get("carrier")
        .and_then(|c| c.get("code"))
        .and_then(|v| v.as_str());
    let airline_name = first
        .get("carrier")
        .and_then(|c| c.get("name"))
        .and_then(|v| v.as_str());
    let flight_number = first.get("code").and_then(|v| v.as_str());
    let airline = derive_airline_code(airline_code, flight_number, airline_name);

    Flight::new(
        PROVIDER_NAME,
        id,
        origin,
        destination,
        departure_time,
        arrival_time,
        Price::new(price_amount, "USD")?,
        CabinClass::new(criteria.cabin_class.class_type),
        stops,
        airline,
        airline_name.map(String::from),
        None,
        flight_number.map(String::from),
        itinerary
            .get("bookingOptions")
            .and_then(|b| b.get("edges"))
            .and_then(|v| v.as_array())
            .and_then(|a| a.first())
            .and_then(|e| e.get("node"))
            .and_then(|n| n.get("bookingUrl"))
            .and_then(|v| v.as_str())
            .map(String::from),
    )
}
