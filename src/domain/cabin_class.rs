//! Cabin class value object (MODULE B), grounded on
//! `original_source/.../domain/value_objects/cabin_class.py`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClassType {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClassType {
    pub fn is_premium(&self) -> bool {
        !matches!(self, CabinClassType::Economy)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CabinClassType::Economy => "economy",
            CabinClassType::PremiumEconomy => "premium_economy",
            CabinClassType::Business => "business",
            CabinClassType::First => "first",
        }
    }
}

impl FromStr for CabinClassType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().trim().replace([' ', '-'], "_");
        match normalized.as_str() {
            "economy" => Ok(CabinClassType::Economy),
            "premium_economy" | "premiumeconomy" => Ok(CabinClassType::PremiumEconomy),
            "business" => Ok(CabinClassType::Business),
            "first" => Ok(CabinClassType::First),
            _ => Err(DomainError::validation_with_value(
                "cabin_class",
                "unrecognized cabin class",
                s,
            )),
        }
    }
}

/// Parse a cabin-class string defaulting to economy on anything unrecognized
/// (used by the presentation layer per spec §4.12, which deliberately does
/// not fail the whole request over an unknown cabin class string).
pub fn parse_cabin_class_lenient(s: &str) -> CabinClassType {
    s.parse().unwrap_or(CabinClassType::Economy)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CabinClass {
    pub class_type: CabinClassType,
}

impl CabinClass {
    pub fn new(class_type: CabinClassType) -> Self {
        Self { class_type }
    }

    pub fn is_premium(&self) -> bool {
        self.class_type.is_premium()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_alias_forms() {
        assert_eq!(
            "premium economy".parse::<CabinClassType>().unwrap(),
            CabinClassType::PremiumEconomy
        );
        assert_eq!(
            "premiumeconomy".parse::<CabinClassType>().unwrap(),
            CabinClassType::PremiumEconomy
        );
        assert_eq!(
            "PREMIUM_ECONOMY".parse::<CabinClassType>().unwrap(),
            CabinClassType::PremiumEconomy
        );
    }

    #[test]
    fn unknown_defaults_to_economy_when_lenient() {
        assert_eq!(
            parse_cabin_class_lenient("business-class-plus"),
            CabinClassType::Economy
        );
    }

    #[test]
    fn is_premium_true_for_all_but_economy() {
        assert!(!CabinClass::new(CabinClassType::Economy).is_premium());
        assert!(CabinClass::new(CabinClassType::Business).is_premium());
        assert!(CabinClass::new(CabinClassType::First).is_premium());
        assert!(CabinClass::new(CabinClassType::PremiumEconomy).is_premium());
    }
}
