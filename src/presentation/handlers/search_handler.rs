//! `search_flights` tool handler (MODULE L), grounded on
//! `original_source/.../presentation/handlers/search_handler.py`. Converts
//! request parameters into a `SearchCriteria`, runs the search use case,
//! and shapes the result into the exact JSON response spec §6.2 names.

use chrono::Utc;
use serde_json::{json, Value};

use crate::application::SearchUseCase;
use crate::infrastructure::providers::Aggregator;
use crate::presentation::error_formatter::{format_error_response, format_success_response};
use crate::presentation::schemas::{to_search_criteria, SearchFlightsParams};

pub struct SearchHandler<'a> {
    aggregator: &'a Aggregator,
    max_results: usize,
}

impl<'a> SearchHandler<'a> {
    pub fn new(aggregator: &'a Aggregator, max_results: usize) -> Self {
        Self {
            aggregator,
            max_results,
        }
    }

    pub async fn handle_search(&self, params: &SearchFlightsParams) -> String {
        let today = Utc::now().date_naive();

        let criteria = match to_search_criteria(params, today) {
            Ok(c) => c,
            Err(err) => return format_error_response(&err).to_string(),
        };

        let use_case = SearchUseCase::new(self.aggregator, self.max_results);
        let result = match use_case.execute(&criteria).await {
            Ok(r) => r,
            Err(err) => return format_error_response(&err).to_string(),
        };

        let price_range = price_range(&result.flights);

        let payload = json!({
            "summary": {
                "total_flights": result.summary.count,
                "search_duration_ms": result.summary.elapsed_ms,
                "providers_used": result.summary.providers_used,
                "cache_hit": result.summary.cache_hit,
                "price_range": price_range,
            },
            "flights": result.flights.iter().map(flight_response).collect::<Vec<_>>(),
        });

        format_success_response(payload).to_string()
    }
}

fn flight_response(dto: &crate::application::dtos::FlightDto) -> Value {
    json!({
        "id": dto.id,
        "origin": dto.origin,
        "destination": dto.destination,
        "departure_time": dto.departure_time,
        "arrival_time": dto.arrival_time,
        "duration_minutes": dto.duration_minutes,
        "price": {
            "amount": dto.price.amount,
            "currency": dto.price.currency,
        },
        "airline": dto.airline,
        "airline_name": dto.airline_name,
        "flight_number": dto.flight_number,
        "cabin_class": dto.cabin_class,
        "stops": dto.stops,
        "is_non_stop": dto.stops == 0,
        "booking_url": dto.booking_url,
    })
}

fn price_range(flights: &[crate::application::dtos::FlightDto]) -> Value {
    if flights.is_empty() {
        return json!({ "min": Value::Null, "max": Value::Null });
    }
    let min = flights.iter().map(|f| f.price.amount).fold(f64::MAX, f64::min);
    let max = flights.iter().map(|f| f.price.amount).fold(f64::MIN, f64::max);
    json!({ "min": min, "max": max })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Airport, CabinClass, CabinClassType, Flight, Price, SearchCriteria};
    use crate::error::DomainError;
    use crate::infrastructure::providers::base::FlightProvider;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    struct StaticProvider(Vec<Flight>);

    #[async_trait]
    impl FlightProvider for StaticProvider {
        fn provider_name(&self) -> &str {
            "kiwi"
        }

        async fn search(&self, _criteria: &SearchCriteria) -> Result<Vec<Flight>, DomainError> {
            Ok(self.0.clone())
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

    fn params() -> SearchFlightsParams {
        SearchFlightsParams {
            origin: "JFK".into(),
            destination: "LAX".into(),
            departure_date: "2099-06-01".into(),
            return_date: None,
            adults: 1,
            children: 0,
            infants: 0,
            cabin_class: "economy".into(),
            max_stops: None,
            non_stop_only: false,
        }
    }

    #[tokio::test]
    async fn successful_search_returns_summary_and_flights() {
        let aggregator = Aggregator::new(vec![Arc::new(StaticProvider(vec![
            flight("1", 100.0),
            flight("2", 300.0),
        ]))]);
        let handler = SearchHandler::new(&aggregator, 50);
        let raw = handler.handle_search(&params()).await;
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["summary"]["total_flights"], json!(2));
        assert_eq!(value["summary"]["price_range"]["min"], json!(100.0));
        assert_eq!(value["summary"]["price_range"]["max"], json!(300.0));
    }

    #[tokio::test]
    async fn invalid_params_return_error_shape() {
        let aggregator = Aggregator::new(vec![Arc::new(StaticProvider(vec![]))]);
        let handler = SearchHandler::new(&aggregator, 50);
        let mut bad_params = params();
        bad_params.destination = "JFK".into();
        let raw = handler.handle_search(&bad_params).await;
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error"]["code"], json!("VALIDATION_ERROR"));
    }
}
