//! Application-layer DTOs (MODULE K), grounded on
//! `original_source/.../presentation/schemas/responses.py`. Kept in the
//! application layer rather than presentation since both the MCP tool
//! handlers and the library-level use cases need the same shape.

use serde::Serialize;

use crate::domain::Flight;

#[derive(Debug, Clone, Serialize)]
pub struct PriceDto {
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlightDto {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration_minutes: i64,
    pub price: PriceDto,
    pub cabin_class: String,
    pub stops: u8,
    pub airline: String,
    pub airline_name: Option<String>,
    pub aircraft: Option<String>,
    pub flight_number: Option<String>,
    pub booking_url: Option<String>,
}

impl From<&Flight> for FlightDto {
    fn from(f: &Flight) -> Self {
        FlightDto {
            id: f.id().to_string(),
            origin: f.origin().code().to_string(),
            destination: f.destination().code().to_string(),
            departure_time: f.departure_time().to_rfc3339(),
            arrival_time: f.arrival_time().to_rfc3339(),
            duration_minutes: f.duration_minutes(),
            price: PriceDto {
                amount: f.price().amount(),
                currency: f.price().currency(),
            },
            cabin_class: f.cabin_class().class_type.as_str().to_string(),
            stops: f.stops(),
            airline: f.airline().to_string(),
            airline_name: f.airline_name().map(String::from),
            aircraft: f.aircraft().map(String::from),
            flight_number: f.flight_number().map(String::from),
            booking_url: f.booking_url().map(String::from),
        }
    }
}

pub fn flights_to_dtos(flights: &[Flight]) -> Vec<FlightDto> {
    flights.iter().map(FlightDto::from).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchSummary {
    pub count: usize,
    pub providers_used: Vec<String>,
    pub elapsed_ms: u128,
    pub cache_hit: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResultDto {
    pub flights: Vec<FlightDto>,
    pub summary: SearchSummary,
}

/// Carries the cache's fraction-form `hit_rate` (per spec §4.4/§8); scaling
/// to a percentage for display happens only at the presentation boundary
/// (see `presentation::handlers::cache_handler`), not here.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsDto {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub max_size: usize,
    pub hit_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheClearResultDto {
    pub entries_removed: usize,
}
