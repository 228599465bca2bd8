//! Date range value object (MODULE B), grounded on
//! `original_source/.../domain/value_objects/date_range.py`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::validation(
                "end",
                "date range end must not precede start",
            ));
        }
        if start < today {
            return Err(DomainError::validation(
                "start",
                "date range start must not be in the past",
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Inclusive of both endpoints.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
