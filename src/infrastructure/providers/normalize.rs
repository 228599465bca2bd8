//! Shared normalization helpers used by every concrete provider adapter
//! (MODULE G). Grounded on
//! `original_source/.../providers/google_flights/time_parser.py` (the
//! 12-hour string parsing) and the airline/price rules scattered across
//! each adapter's `response_mapper.py` — the pack's three back-ends agree
//! closely enough on these three rules that hoisting them here avoids
//! triplicated logic, while the genuinely-divergent "stops" rule stays
//! per-adapter (see DESIGN.md).

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;

use once_cell::sync::Lazy;

/// Derives a usable airline code from whatever a back-end provided,
/// following the fallback chain in spec §4.6: explicit code → flight-number
/// alpha prefix → first two letters of the name → `XX`.
pub fn derive_airline_code(
    explicit_code: Option<&str>,
    flight_number: Option<&str>,
    airline_name: Option<&str>,
) -> String {
    if let Some(code) = explicit_code {
        let trimmed = code.trim().to_uppercase();
        if (2..=3).contains(&trimmed.len()) && trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return trimmed;
        }
    }
    if let Some(num) = flight_number {
        let prefix: String = num.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
        if prefix.len() >= 2 {
            return prefix.to_uppercase();
        }
    }
    if let Some(name) = airline_name {
        let letters: String = name.chars().filter(|c| c.is_ascii_alphabetic()).collect();
        if letters.len() >= 2 {
            return letters[..2].to_uppercase();
        }
    }
    "XX".to_string()
}

/// Detects minor-unit (integer cents) quoting — "no decimal point and
/// length > 2" — and returns the canonical major-unit amount.
pub fn normalize_price_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if !trimmed.contains('.') && trimmed.len() > 2 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        let cents: i64 = trimmed.parse().ok()?;
        return Some(cents as f64 / 100.0);
    }
    trimmed.parse::<f64>().ok()
}

static TIME_12H_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)\s*(\d{1,2}):(\d{2})\s*([AP]M)\s*(?:\+(\d+))?\s*$").unwrap()
});

/// Parses the timestamp shapes named in spec §4.6:
/// - ISO-8601 with/without trailing `Z`
/// - structured `{year,month,day,hour,minute,second}` (passed pre-split as a tuple)
/// - 12-hour `"2:40 PM+N"` strings, resolved against a base date and an
///   optional reference time (departure) for the midnight-rollover rule.
pub fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Accept a bare "YYYY-MM-DDTHH:MM:SS" without offset, treated as UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub fn from_structured(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parses a 12-hour string like `"2:40 PM"` or `"2:40 PM+1"` against
/// `base_date`. When no explicit `+N` offset is present and `reference` is
/// given, an arrival that would otherwise precede the reference is silently
/// advanced by one day (the segment crossed midnight).
pub fn parse_12h_with_rollover(
    raw: &str,
    base_date: NaiveDate,
    reference: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    let caps = TIME_12H_RE.captures(raw)?;
    let mut hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    let meridiem = caps[3].to_uppercase();
    let explicit_offset: Option<i64> = caps.get(4).and_then(|m| m.as_str().parse().ok());

    if meridiem == "PM" && hour != 12 {
        hour += 12;
    } else if meridiem == "AM" && hour == 12 {
        hour = 0;
    }

    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    let mut date = base_date;
    if let Some(offset) = explicit_offset {
        date += Duration::days(offset);
    }
    let mut result = Utc.from_utc_datetime(&date.and_time(time));

    if explicit_offset.is_none() {
        if let Some(reference) = reference {
            if result <= reference {
                result += Duration::days(1);
            }
        }
    }

    Some(result)
}
