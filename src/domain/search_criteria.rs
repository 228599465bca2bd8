//! SearchCriteria entity (MODULE B), grounded on
//! `original_source/.../domain/entities/search_criteria.py`.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::airport::Airport;
use crate::domain::cabin_class::CabinClass;
use crate::domain::date_range::DateRange;
use crate::domain::passenger_config::PassengerConfig;
use crate::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub origin: Airport,
    pub destination: Airport,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub passengers: PassengerConfig,
    pub cabin_class: CabinClass,
    pub max_stops: Option<u8>,
    pub non_stop_only: bool,
    pub flexible_dates: bool,
    pub flexibility_days: Option<u8>,
}

#[allow(clippy::too_many_arguments)]
impl SearchCriteria {
    pub fn new(
        origin: Airport,
        destination: Airport,
        departure_date: NaiveDate,
        return_date: Option<NaiveDate>,
        passengers: PassengerConfig,
        cabin_class: CabinClass,
        max_stops: Option<u8>,
        non_stop_only: bool,
        flexible_dates: bool,
        flexibility_days: Option<u8>,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        if origin == destination {
            return Err(DomainError::validation(
                "destination",
                "origin and destination must differ",
            ));
        }
        if departure_date < today {
            return Err(DomainError::validation(
                "departure_date",
                "departure date must not be in the past",
            ));
        }
        if let Some(ret) = return_date {
            if ret <= departure_date {
                return Err(DomainError::validation(
                    "return_date",
                    "return date must be after departure date",
                ));
            }
            if (ret - departure_date).num_days() > 365 {
                return Err(DomainError::validation(
                    "return_date",
                    "trip length must not exceed 365 days",
                ));
            }
        }
        if let Some(stops) = max_stops {
            if stops > 5 {
                return Err(DomainError::validation_with_value(
                    "max_stops",
                    "max_stops must be between 0 and 5",
                    stops,
                ));
            }
            if non_stop_only && stops > 0 {
                return Err(DomainError::validation(
                    "max_stops",
                    "max_stops > 0 is mutually exclusive with non_stop_only",
                ));
            }
        }
        if let Some(days) = flexibility_days {
            if !(1..=7).contains(&days) {
                return Err(DomainError::validation_with_value(
                    "flexibility_days",
                    "flexibility_days must be between 1 and 7",
                    days,
                ));
            }
        }

        Ok(Self {
            origin,
            destination,
            departure_date,
            return_date,
            passengers,
            cabin_class,
            max_stops,
            non_stop_only,
            flexible_dates,
            flexibility_days,
        })
    }

    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }

    pub fn effective_max_stops(&self) -> Option<u8> {
        if self.non_stop_only {
            Some(0)
        } else {
            self.max_stops
        }
    }

    pub fn departure_window(&self, today: NaiveDate) -> DateRange {
        self.flexible_window(self.departure_date, today)
    }

    pub fn return_window(&self, today: NaiveDate) -> Option<DateRange> {
        self.return_date.map(|d| self.flexible_window(d, today))
    }

    fn flexible_window(&self, center: NaiveDate, today: NaiveDate) -> DateRange {
        let days = if self.flexible_dates {
            self.flexibility_days.unwrap_or(1) as i64
        } else {
            0
        };
        let start = (center - Duration::days(days)).max(today);
        let end = center + Duration::days(days);
        DateRange::new(start, end.max(start), today)
            .expect("clamped start/end must satisfy DateRange invariants")
    }
}
