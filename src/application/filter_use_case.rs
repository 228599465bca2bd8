//! Filter/sort use case (MODULE K supplement, SPEC §4.11a), grounded on
//! `original_source/.../application/use_cases/filter_flights.py`. A pure
//! function over an in-memory flight list — no I/O, no caching. Not wired
//! as an additional MCP tool (see DESIGN.md); exposed for library
//! consumers and exercised directly by tests.

use crate::domain::Flight;
use crate::error::DomainError;

#[derive(Debug, Clone, Default)]
pub struct FlightFilter {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub max_stops: Option<u8>,
    pub airlines: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Price,
    Duration,
    DepartureTime,
}

impl SortField {
    fn parse(s: &str) -> Result<Self, DomainError> {
        match s.to_lowercase().as_str() {
            "price" => Ok(SortField::Price),
            "duration" => Ok(SortField::Duration),
            "departure_time" => Ok(SortField::DepartureTime),
            other => Err(DomainError::validation_with_value(
                "sort_by",
                "unrecognized sort field",
                other,
            )),
        }
    }
}

/// Applies `filter` (all criteria AND-combined) then sorts by `sort_by`
/// (one of `"price"`, `"duration"`, `"departure_time"`), ascending unless
/// `sort_descending`.
pub fn filter_and_sort(
    flights: &[Flight],
    filter: &FlightFilter,
    sort_by: &str,
    sort_descending: bool,
) -> Result<Vec<Flight>, DomainError> {
    let field = SortField::parse(sort_by)?;

    let mut filtered: Vec<Flight> = flights
        .iter()
        .filter(|f| matches(f, filter))
        .cloned()
        .collect();

    filtered.sort_by(|a, b| {
        let ordering = match field {
            SortField::Price => a
                .price()
                .partial_cmp(&b.price())
                .unwrap_or(std::cmp::Ordering::Equal),
            SortField::Duration => a.duration_minutes().cmp(&b.duration_minutes()),
            SortField::DepartureTime => a.departure_time().cmp(&b.departure_time()),
        };
        if sort_descending {
            ordering.reverse()
        } else {
            ordering
        }
    });

    Ok(filtered)
}

fn matches(flight: &Flight, filter: &FlightFilter) -> bool {
    if let Some(min) = filter.min_price {
        if flight.price().amount() < min {
            return false;
        }
    }
    if let Some(max) = filter.max_price {
        if flight.price().amount() > max {
            return false;
        }
    }
    if let Some(max_stops) = filter.max_stops {
        if flight.stops() > max_stops {
            return false;
        }
    }
    if let Some(airlines) = &filter.airlines {
        if !airlines.iter().any(|a| a.eq_ignore_ascii_case(flight.airline())) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Airport, CabinClass, CabinClassType, Price};
    use chrono::{TimeZone, Utc};

    fn flight(id: &str, price: f64, stops: u8, airline: &str, dep_hour: u32) -> Flight {
        Flight::new(
            "kiwi",
            id,
            Airport::new("JFK").unwrap(),
            Airport::new("LAX").unwrap(),
            Utc.with_ymd_and_hms(2026, 6, 1, dep_hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 6, 1, dep_hour + 5, 0, 0).unwrap(),
            Price::new(price, "USD").unwrap(),
            CabinClass::new(CabinClassType::Economy),
            stops,
            airline.into(),
            None,
            None,
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn filters_by_price_range() {
        let flights = vec![flight("1", 100.0, 0, "DL", 6), flight("2", 500.0, 0, "DL", 8)];
        let filter = FlightFilter {
            max_price: Some(200.0),
            ..Default::default()
        };
        let result = filter_and_sort(&flights, &filter, "price", false).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id(), "kiwi_1");
    }

    #[test]
    fn filters_by_airline_case_insensitive() {
        let flights = vec![flight("1", 100.0, 0, "DL", 6), flight("2", 100.0, 0, "AA", 8)];
        let filter = FlightFilter {
            airlines: Some(vec!["dl".to_string()]),
            ..Default::default()
        };
        let result = filter_and_sort(&flights, &filter, "price", false).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].airline(), "DL");
    }

    #[test]
    fn sorts_descending_by_duration() {
        let flights = vec![flight("1", 100.0, 0, "DL", 6), flight("2", 100.0, 0, "DL", 8)];
        let result = filter_and_sort(&flights, &FlightFilter::default(), "departure_time", true).unwrap();
        assert_eq!(result[0].id(), "kiwi_2");
    }

    #[test]
    fn rejects_unknown_sort_field() {
        let flights = vec![flight("1", 100.0, 0, "DL", 6)];
        assert!(filter_and_sort(&flights, &FlightFilter::default(), "bogus", false).is_err());
    }
}
