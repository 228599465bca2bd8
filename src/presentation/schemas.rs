//! MCP tool-invocation parameter shapes and request→domain conversion
//! (MODULE L), grounded on
//! `original_source/.../presentation/schemas/{requests,converters}.py`. The
//! parameter structs double as the JSON Schema source via `schemars`, the
//! role `pydantic`'s field validators played in the original — schema
//! generation happens declaratively, validation happens in
//! [`to_search_criteria`] against the domain invariants themselves.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::domain::{Airport, CabinClass, PassengerConfig, SearchCriteria};
use crate::error::DomainError;

fn default_adults() -> u8 {
    1
}

fn default_cabin_class() -> String {
    "economy".to_string()
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchFlightsParams {
    /// Origin airport IATA code, e.g. "JFK".
    pub origin: String,
    /// Destination airport IATA code, e.g. "LAX".
    pub destination: String,
    /// Departure date, "YYYY-MM-DD".
    pub departure_date: String,
    /// Return date, "YYYY-MM-DD"; omit for a one-way search.
    pub return_date: Option<String>,
    #[serde(default = "default_adults")]
    pub adults: u8,
    #[serde(default)]
    pub children: u8,
    #[serde(default)]
    pub infants: u8,
    /// "economy", "premium_economy", "business", or "first" (alias forms
    /// like "premium economy" accepted, unknown values default to economy).
    #[serde(default = "default_cabin_class")]
    pub cabin_class: String,
    pub max_stops: Option<u8>,
    #[serde(default)]
    pub non_stop_only: bool,
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        DomainError::validation_with_value(field, "expected date in YYYY-MM-DD format", raw)
    })
}

/// Converts validated request parameters into a [`SearchCriteria`],
/// propagating any domain-invariant violation as a `Validation` error.
pub fn to_search_criteria(
    params: &SearchFlightsParams,
    today: NaiveDate,
) -> Result<SearchCriteria, DomainError> {
    let origin = Airport::new(&params.origin)?;
    let destination = Airport::new(&params.destination)?;
    let departure_date = parse_date(&params.departure_date, "departure_date")?;
    let return_date = params
        .return_date
        .as_deref()
        .map(|d| parse_date(d, "return_date"))
        .transpose()?;
    let passengers = PassengerConfig::new(params.adults, params.children, params.infants)?;
    let cabin_class = CabinClass::new(crate::domain::cabin_class::parse_cabin_class_lenient(
        &params.cabin_class,
    ));

    SearchCriteria::new(
        origin,
        destination,
        departure_date,
        return_date,
        passengers,
        cabin_class,
        params.max_stops,
        params.non_stop_only,
        false,
        None,
        today,
    )
}
