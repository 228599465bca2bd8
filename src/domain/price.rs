//! Price value object (MODULE B), grounded on
//! `original_source/.../domain/value_objects/price.py`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Non-negative fixed-point amount (stored as integer minor units to avoid
/// floating-point drift across comparisons) plus a 3-letter uppercase
/// ISO-4217 currency code. Ordering/arithmetic are only defined between
/// prices of the same currency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Price {
    /// Amount in minor units (cents), so `amount() == minor_units as f64 / 100.0`.
    minor_units: i64,
    currency: [u8; 3],
}

impl Price {
    pub fn new(amount: f64, currency: impl AsRef<str>) -> Result<Self, DomainError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::validation_with_value(
                "amount",
                "price amount must be non-negative",
                amount,
            ));
        }
        let minor_units = (amount * 100.0).round() as i64;
        if (minor_units as f64 / 100.0 - amount).abs() > 0.005 {
            return Err(DomainError::validation_with_value(
                "amount",
                "price amount must have at most 2 fractional digits",
                amount,
            ));
        }
        let normalized = currency.as_ref().trim().to_uppercase();
        if normalized.len() != 3 || !normalized.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::validation_with_value(
                "currency",
                "currency must be a 3-letter ISO-4217 code",
                normalized,
            ));
        }
        let mut bytes = [0u8; 3];
        bytes.copy_from_slice(normalized.as_bytes());
        Ok(Self {
            minor_units,
            currency: bytes,
        })
    }

    pub fn amount(&self) -> f64 {
        self.minor_units as f64 / 100.0
    }

    pub fn currency(&self) -> String {
        String::from_utf8_lossy(&self.currency).to_string()
    }

    /// Mean of two same-currency prices, used by the aggregator's
    /// deduplication tolerance check.
    pub fn mean_with(&self, other: &Price) -> Result<f64, DomainError> {
        self.require_same_currency(other)?;
        Ok((self.amount() + other.amount()) / 2.0)
    }

    pub fn diff_with(&self, other: &Price) -> Result<f64, DomainError> {
        self.require_same_currency(other)?;
        Ok((self.amount() - other.amount()).abs())
    }

    fn require_same_currency(&self, other: &Price) -> Result<(), DomainError> {
        if self.currency != other.currency {
            return Err(DomainError::validation(
                "currency",
                format!(
                    "cannot compare prices in different currencies: {} vs {}",
                    self.currency(),
                    other.currency()
                ),
            ));
        }
        Ok(())
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.minor_units == other.minor_units && self.currency == other.currency
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.currency != other.currency {
            return None;
        }
        Some(self.minor_units.cmp(&other.minor_units))
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} {}", self.amount(), self.currency())
    }
}
