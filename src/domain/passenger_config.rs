//! Passenger configuration value object (MODULE B), grounded on
//! `original_source/.../domain/value_objects/passenger_config.py`.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerConfig {
    adults: u8,
    children: u8,
    infants: u8,
}

impl PassengerConfig {
    pub fn new(adults: u8, children: u8, infants: u8) -> Result<Self, DomainError> {
        if !(1..=9).contains(&adults) {
            return Err(DomainError::validation_with_value(
                "adults",
                "adults must be between 1 and 9",
                adults,
            ));
        }
        if children > 8 {
            return Err(DomainError::validation_with_value(
                "children",
                "children must be between 0 and 8",
                children,
            ));
        }
        if infants > 4 {
            return Err(DomainError::validation_with_value(
                "infants",
                "infants must be between 0 and 4",
                infants,
            ));
        }
        let total = adults as u16 + children as u16 + infants as u16;
        if total > 9 {
            return Err(DomainError::validation_with_value(
                "total",
                "total passengers cannot exceed 9",
                total,
            ));
        }
        if infants > adults {
            return Err(DomainError::validation(
                "infants",
                "infants cannot exceed number of adults",
            ));
        }
        Ok(Self {
            adults,
            children,
            infants,
        })
    }

    pub fn total(&self) -> u16 {
        self.adults as u16 + self.children as u16 + self.infants as u16
    }

    pub fn adults(&self) -> u8 {
        self.adults
    }

    pub fn children(&self) -> u8 {
        self.children
    }

    pub fn infants(&self) -> u8 {
        self.infants
    }
}

impl Default for PassengerConfig {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_one_adult() {
        let p = PassengerConfig::default();
        assert_eq!(p.adults(), 1);
        assert_eq!(p.total(), 1);
    }

    #[test]
    fn rejects_total_over_nine() {
        assert!(PassengerConfig::new(9, 1, 0).is_err());
    }

    #[test]
    fn rejects_infants_over_adults() {
        assert!(PassengerConfig::new(1, 0, 2).is_err());
    }

    #[test]
    fn rejects_zero_adults() {
        assert!(PassengerConfig::new(0, 0, 0).is_err());
    }

    #[test]
    fn accepts_boundary_values() {
        assert!(PassengerConfig::new(9, 0, 0).is_ok());
        assert!(PassengerConfig::new(1, 8, 0).is_ok());
        assert!(PassengerConfig::new(2, 7, 1).is_err());
    }
}
