//! Skyscanner adapter (two-phase poll shape, direct partner API), grounded
//! on `original_source/.../providers/skyscanner/{api_client,constants,
//! response_mapper,skyscanner_provider}.py`. The RapidAPI-hosted Skyscanner
//! product (`rapidapi_skyscanner.rs`) is a near-duplicate of this client
//! with different host/auth/endpoint constants; it reuses
//! [`map_poll_response`] rather than re-deriving the same graph-of-IDs
//! parsing logic.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Airport, CabinClass, CabinClassType, Flight, Price, SearchCriteria};
use crate::error::DomainError;
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::providers::base::{run_provider_search, FlightProvider};
use crate::infrastructure::providers::normalize::{derive_airline_code, normalize_price_amount, parse_iso8601};
use crate::infrastructure::providers::poll::{run_two_phase_poll, PollStatus, PollingBackend};
use crate::infrastructure::rate_limiter::RateLimiter;

pub const PROVIDER_NAME: &str = "skyscanner";
const CREATE_URL: &str = "https://partners.api.skyscanner.net/apiservices/v3/flights/live/search/create";
const POLL_URL_BASE: &str = "https://partners.api.skyscanner.net/apiservices/v3/flights/live/search/poll";

pub struct SkyscannerProvider {
    http: Arc<HttpClient>,
    limiter: RateLimiter,
    api_key: String,
}

impl SkyscannerProvider {
    pub fn new(http: Arc<HttpClient>, api_key: String, rate: f64, per: f64) -> Self {
        Self {
            http,
            limiter: RateLimiter::new(rate, per),
            api_key,
        }
    }

    fn cabin_code(class: CabinClassType) -> &'static str {
        match class {
            CabinClassType::Economy => "CABIN_CLASS_ECONOMY",
            CabinClassType::PremiumEconomy => "CABIN_CLASS_PREMIUM_ECONOMY",
            CabinClassType::Business => "CABIN_CLASS_BUSINESS",
            CabinClassType::First => "CABIN_CLASS_FIRST",
        }
    }

    fn build_query_legs(criteria: &SearchCriteria) -> Value {
        let mut legs = vec![serde_json::json!({
            "originPlaceId": {"iata": criteria.origin.code()},
            "destinationPlaceId": {"iata": criteria.destination.code()},
            "date": {
                "year": criteria.departure_date.format("%Y").to_string(),
                "month": criteria.departure_date.format("%m").to_string(),
                "day": criteria.departure_date.format("%d").to_string(),
            }
        })];
        if let Some(ret) = criteria.return_date {
            legs.push(serde_json::json!({
                "originPlaceId": {"iata": criteria.destination.code()},
                "destinationPlaceId": {"iata": criteria.origin.code()},
                "date": {
                    "year": ret.format("%Y").to_string(),
                    "month": ret.format("%m").to_string(),
                    "day": ret.format("%d").to_string(),
                }
            }));
        }
        Value::Array(legs)
    }
}

/// Pairs the HTTP plumbing with the criteria of a single search so it can
/// implement [`PollingBackend`] by value, owning everything it needs across
/// the poll loop's awaits.
pub struct SkyscannerSession {
    http: Arc<HttpClient>,
    api_key: String,
    criteria: SearchCriteria,
}

#[async_trait]
impl PollingBackend for SkyscannerSession {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn create_session(&self) -> Result<String, DomainError> {
        self.create_session_impl(&self.criteria).await
    }

    async fn poll_once(&self, session_token: &str) -> Result<(Value, PollStatus), DomainError> {
        self.poll_once_impl(session_token).await
    }
}

impl SkyscannerSession {
    async fn create_session_impl(&self, criteria: &SearchCriteria) -> Result<String, DomainError> {
        let mut headers = HashMap::new();
        headers.insert("X-API-Key".to_string(), self.api_key.clone());

        let body = serde_json::json!({
            "query": {
                "market": "US",
                "locale": "en-US",
                "currency": "USD",
                "queryLegs": SkyscannerProvider::build_query_legs(criteria),
                "cabinClass": SkyscannerProvider::cabin_code(criteria.cabin_class.class_type),
                "adults": 1,
            }
        });

        let response = self.http.post_json(CREATE_URL, &body, &headers).await?;
        response
            .get("sessionToken")
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| DomainError::provider(PROVIDER_NAME, "missing session token"))
    }

    async fn poll_once_impl(&self, session_token: &str) -> Result<(Value, PollStatus), DomainError> {
        let mut headers = HashMap::new();
        headers.insert("X-API-Key".to_string(), self.api_key.clone());
        let url = format!("{POLL_URL_BASE}/{session_token}");
        let body = self.http.get_json(&url, &[], &headers).await?;

        let status = match body.get("status").and_then(|v| v.as_str()) {
            Some("RESULT_STATUS_COMPLETE") => PollStatus::Complete,
            Some("RESULT_STATUS_IN_PROGRESS") => PollStatus::InProgress,
            Some("RESULT_STATUS_FAILED") => PollStatus::Failed,
            _ => PollStatus::Unknown,
        };
        Ok((body, status))
    }
}

#[async_trait]
impl FlightProvider for SkyscannerProvider {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Flight>, DomainError> {
        let session = SkyscannerSession {
            http: self.http.clone(),
            api_key: self.api_key.clone(),
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

/// Maps a completed Skyscanner-shaped poll response (shared by both the
/// direct partner API and the RapidAPI-hosted variant) into canonical
/// flights. The response is a graph of IDs: itineraries reference legs,
/// legs reference places/carriers/segments by key.
pub fn map_poll_response(
    body: &Value,
    criteria: &SearchCriteria,
    provider_name: &'static str,
) -> Result<Vec<Flight>, DomainError> {
    let content = body.get("content").unwrap_or(body);
    let results = content.get("results").unwrap_or(content);

    let legs = results.get("legs").and_then(|v| v.as_object());
    let carriers = results.get("carriers").and_then(|v| v.as_object());
    let itineraries = results
        .get("itineraries")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let mut flights = Vec::new();
    for (id, itinerary) in itineraries.iter() {
        match map_one(id, itinerary, legs, carriers, criteria, provider_name) {
            Ok(flight) => flights.push(flight),
            Err(_) => {
                tracing::warn!(provider = provider_name, "skipping unmappable itinerary");
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

fn map_one(
    id: &str,
    itinerary: &Value,
    legs: Option<&serde_json::Map<String, Value>>,
    carriers: Option<&serde_json::Map<String, Value>>,
    criteria: &SearchCriteria,
    provider_name: &'static str,
) -> Result<Flight, DomainError> {
    let leg_ids = itinerary
        .get("legIds")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    let first_leg_id = leg_ids
        .first()
        .and_then(|v| v.as_str())
        .ok_or_else(|| DomainError::provider(provider_name, "itinerary has no legs"))?;
    let leg = legs
        .and_then(|l| l.get(first_leg_id))
        .ok_or_else(|| DomainError::provider(provider_name, "referenced leg not found"))?;

    let origin_code = leg
        .get("originPlaceId")
        .and_then(|v| v.as_str())
        .map(|s| &s[..s.len().min(3)]);
    let dest_code = leg
        .get("destinationPlaceId")
        .and_then(|v| v.as_str())
        .map(|s| &s[..s.len().min(3)]);

    let origin = Airport::from_code_or_placeholder(origin_code.or(Some(criteria.origin.code())));
    let destination =
        Airport::from_code_or_placeholder(dest_code.or(Some(criteria.destination.code())));

    let departure_time = leg
        .get("departureDateTime")
        .and_then(|v| v.as_str())
        .and_then(parse_iso8601)
        .ok_or_else(|| DomainError::provider(provider_name, "unparseable departure time"))?;
    let arrival_time = leg
        .get("arrivalDateTime")
        .and_then(|v| v.as_str())
        .and_then(parse_iso8601)
        .ok_or_else(|| DomainError::provider(provider_name, "unparseable arrival time"))?;

    // Skyscanner's own stops rule: read the field directly, no double-counting.
    let stops = leg
        .get("stopCount")
        .and_then(|v| v.as_u64())
        .unwrap_or(0)
        .min(5) as u8;

    let price_raw = itinerary
        .get("pricingOptions")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .and_then(|p| p.get("price"))
        .and_then(|p| p.get("amount"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| DomainError::provider(provider_name, "missing price"))?;
    let price_amount = normalize_price_amount(price_raw)
        .ok_or_else(|| DomainError::provider(provider_name, "unparseable price"))?;

    let carrier_id = leg
        .get("marketingCarrierIds")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .and_then(|v| v.as_str());
    let carrier = carrier_id
        .and_then(|cid| carriers.and_then(|c| c.get(cid)));
    let airline_code = carrier.and_then(|c| c.get("iata")).and_then(|v| v.as_str());
    let airline_name = carrier.and_then(|c| c.get("name")).and_then(|v| v.as_str());
    let airline = derive_airline_code(airline_code, None, airline_name);

    Flight::new(
        provider_name,
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
        None,
        itinerary
            .get("pricingOptions")
            .and_then(|v| v.as_array())
            .and_then(|a| a.first())
            .and_then(|p| p.get("items"))
            .and_then(|v| v.as_array())
            .and_then(|a| a.first())
            .and_then(|i| i.get("deepLink"))
            .and_then(|v| v.as_str())
            .map(String::from),
    )
}
