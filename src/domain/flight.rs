//! Flight entity (MODULE B), grounded on
//! `original_source/.../domain/entities/flight.py`.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::airport::Airport;
use crate::domain::cabin_class::CabinClass;
use crate::domain::price::Price;
use crate::error::DomainError;

/// All fields are private and reached only through constructor-validated
/// accessors, mirroring [`Airport`] and [`Price`] — a `Flight` can only
/// exist in a state that already satisfied every invariant in [`Flight::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    id: String,
    origin: Airport,
    destination: Airport,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    price: Price,
    cabin_class: CabinClass,
    stops: u8,
    airline: String,
    airline_name: Option<String>,
    aircraft: Option<String>,
    flight_number: Option<String>,
    booking_url: Option<String>,
}

#[allow(clippy::too_many_arguments)]
impl Flight {
    pub fn new(
        provider: &str,
        back_end_id: &str,
        origin: Airport,
        destination: Airport,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
        price: Price,
        cabin_class: CabinClass,
        stops: u8,
        airline: String,
        airline_name: Option<String>,
        aircraft: Option<String>,
        flight_number: Option<String>,
        booking_url: Option<String>,
    ) -> Result<Self, DomainError> {
        if origin == destination {
            return Err(DomainError::validation(
                "destination",
                "origin and destination must differ",
            ));
        }
        if arrival_time <= departure_time {
            return Err(DomainError::validation(
                "arrival_time",
                "arrival time must be after departure time",
            ));
        }
        let duration = arrival_time - departure_time;
        if duration.num_minutes() >= 1440 {
            return Err(DomainError::validation(
                "arrival_time",
                "flight duration must be under 24 hours; longer spans are treated as multi-segment data errors",
            ));
        }
        if !(0..=5).contains(&stops) {
            return Err(DomainError::validation_with_value(
                "stops",
                "stops must be between 0 and 5",
                stops,
            ));
        }
        let airline = airline.trim().to_uppercase();
        if !(2..=3).contains(&airline.len()) || !airline.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(DomainError::validation_with_value(
                "airline",
                "airline code must be 2-3 alphanumeric characters",
                airline,
            ));
        }

        Ok(Self {
            id: format!("{provider}_{back_end_id}"),
            origin,
            destination,
            departure_time,
            arrival_time,
            price,
            cabin_class,
            stops,
            airline,
            airline_name,
            aircraft,
            flight_number,
            booking_url,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn origin(&self) -> &Airport {
        &self.origin
    }

    pub fn destination(&self) -> &Airport {
        &self.destination
    }

    pub fn departure_time(&self) -> DateTime<Utc> {
        self.departure_time
    }

    pub fn arrival_time(&self) -> DateTime<Utc> {
        self.arrival_time
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn cabin_class(&self) -> CabinClass {
        self.cabin_class
    }

    pub fn stops(&self) -> u8 {
        self.stops
    }

    pub fn airline(&self) -> &str {
        &self.airline
    }

    pub fn airline_name(&self) -> Option<&str> {
        self.airline_name.as_deref()
    }

    pub fn aircraft(&self) -> Option<&str> {
        self.aircraft.as_deref()
    }

    pub fn flight_number(&self) -> Option<&str> {
        self.flight_number.as_deref()
    }

    pub fn booking_url(&self) -> Option<&str> {
        self.booking_url.as_deref()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.arrival_time - self.departure_time).num_minutes()
    }

    pub fn is_non_stop(&self) -> bool {
        self.stops == 0
    }
}

impl PartialEq for Flight {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Flight {}

impl Hash for Flight {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cabin_class::CabinClassType;
    use chrono::TimeZone;

    fn jfk() -> Airport {
        Airport::new("JFK").unwrap()
    }
    fn lax() -> Airport {
        Airport::new("LAX").unwrap()
    }
    fn t(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, h, 0, 0).unwrap()
    }

    fn economy() -> CabinClass {
        CabinClass::new(CabinClassType::Economy)
    }

    #[test]
    fn rejects_same_origin_destination() {
        let r = Flight::new(
            "kiwi", "1", jfk(), jfk(), t(10), t(15),
            Price::new(100.0, "USD").unwrap(), economy(), 0, "DL".into(), None, None, None, None,
        );
        assert!(r.is_err());
    }

    #[test]
    fn rejects_arrival_before_departure() {
        let r = Flight::new(
            "kiwi", "1", jfk(), lax(), t(15), t(10),
            Price::new(100.0, "USD").unwrap(), economy(), 0, "DL".into(), None, None, None, None,
        );
        assert!(r.is_err());
    }

    #[test]
    fn rejects_multi_day_duration() {
        let dep = t(10);
        let arr = dep + chrono::Duration::hours(25);
        let r = Flight::new(
            "kiwi", "1", jfk(), lax(), dep, arr,
            Price::new(100.0, "USD").unwrap(), economy(), 0, "DL".into(), None, None, None, None,
        );
        assert!(r.is_err());
    }

    #[test]
    fn id_is_namespaced_by_provider() {
        let f = Flight::new(
            "kiwi", "abc123", jfk(), lax(), t(10), t(15),
            Price::new(100.0, "USD").unwrap(), economy(), 0, "dl".into(), None, None, None, None,
        )
        .unwrap();
        assert_eq!(f.id(), "kiwi_abc123");
        assert_eq!(f.airline(), "DL");
    }

    #[test]
    fn derived_fields() {
        let f = Flight::new(
            "kiwi", "1", jfk(), lax(), t(10), t(15),
            Price::new(100.0, "USD").unwrap(), economy(), 0, "DL".into(), None, None, None, None,
        )
        .unwrap();
        assert_eq!(f.duration_minutes(), 300);
        assert!(f.is_non_stop());
    }
}
