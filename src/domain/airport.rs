//! Airport value object (MODULE B), grounded on
//! `original_source/.../domain/value_objects/airport.py`.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Canonical 3-letter uppercase IATA airport code, with optional display
/// metadata. Equality and hashing are over `code` only — two `Airport`s
/// with the same code but different names are the same airport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airport {
    code: String,
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl Airport {
    /// Validates and normalizes `code`: trims whitespace, uppercases, and
    /// requires exactly 3 alphabetic characters.
    pub fn new(code: impl AsRef<str>) -> Result<Self, DomainError> {
        Self::with_metadata(code, None, None, None)
    }

    pub fn with_metadata(
        code: impl AsRef<str>,
        name: Option<String>,
        city: Option<String>,
        country: Option<String>,
    ) -> Result<Self, DomainError> {
        let trimmed = code.as_ref().trim().to_uppercase();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::validation_with_value(
                "code",
                "airport code must be exactly 3 alphabetic characters",
                trimmed,
            ));
        }
        Ok(Self {
            code: trimmed,
            name,
            city,
            country,
        })
    }

    /// Best-effort fallback used by provider response mappers when a
    /// back-end omits or mangles an airport code: returns `XXX` instead of
    /// failing the whole itinerary.
    pub fn from_code_or_placeholder(code: Option<&str>) -> Airport {
        match code {
            Some(c) => Airport::new(c).unwrap_or_else(|_| Airport::placeholder()),
            None => Airport::placeholder(),
        }
    }

    fn placeholder() -> Airport {
        Airport {
            code: "XXX".to_string(),
            name: None,
            city: None,
            country: None,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

impl PartialEq for Airport {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}
impl Eq for Airport {}

impl Hash for Airport {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl std::fmt::Display for Airport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let a = Airport::new(" jfk ").unwrap();
        assert_eq!(a.code(), "JFK");
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Airport::new("JFKX").is_err());
        assert!(Airport::new("JF").is_err());
    }

    #[test]
    fn rejects_non_alphabetic() {
        assert!(Airport::new("J1K").is_err());
    }

    #[test]
    fn equality_ignores_metadata() {
        let a = Airport::with_metadata("JFK", Some("JFK Intl".into()), None, None).unwrap();
        let b = Airport::new("JFK").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn placeholder_on_missing_code() {
        let a = Airport::from_code_or_placeholder(None);
        assert_eq!(a.code(), "XXX");
        let b = Airport::from_code_or_placeholder(Some("12"));
        assert_eq!(b.code(), "XXX");
    }
}
