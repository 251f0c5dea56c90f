//! Shared parsing utilities for SOTA API fields.
//!
//! Frequency and timestamp coercion used when normalizing spots.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

/// A frequency is digits with an optional fractional part, nothing else.
static FREQUENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?$").expect("valid regex"));

/// Parses a spotted frequency in MHz. Anything that is not plain
/// `digits[.digits]` becomes `0.0`.
#[must_use]
pub fn parse_frequency(s: &str) -> f64 {
    let s = s.trim();
    if !FREQUENCY_RE.is_match(s) {
        return 0.0;
    }
    s.parse().unwrap_or(0.0)
}

/// Parses a SOTA API timestamp.
///
/// The API normally sends naive UTC (`2024-05-11T10:21:42` with optional
/// fractional seconds); RFC 3339 with an offset is accepted too.
#[must_use]
pub fn parse_spot_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_frequencies() {
        assert!((parse_frequency("14.074") - 14.074).abs() < f64::EPSILON);
        assert!((parse_frequency("7") - 7.0).abs() < f64::EPSILON);
        assert!((parse_frequency(" 145.500 ") - 145.5).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_frequency_becomes_zero() {
        assert!(parse_frequency("14,062").abs() < f64::EPSILON);
        assert!(parse_frequency("QRV").abs() < f64::EPSILON);
        assert!(parse_frequency("").abs() < f64::EPSILON);
        assert!(parse_frequency("7.032.5").abs() < f64::EPSILON);
    }

    #[test]
    fn parses_timestamp_with_fractional() {
        let dt = parse_spot_timestamp("2024-05-11T10:21:42.6").unwrap();
        assert_eq!(dt.to_string(), "2024-05-11 10:21:42.600 UTC");
    }

    #[test]
    fn parses_timestamp_without_fractional() {
        let dt = parse_spot_timestamp("2024-05-11T10:21:42").unwrap();
        assert_eq!(dt.to_string(), "2024-05-11 10:21:42 UTC");
    }

    #[test]
    fn parses_rfc3339_timestamp() {
        let dt = parse_spot_timestamp("2024-05-11T12:21:42+02:00").unwrap();
        assert_eq!(dt.to_string(), "2024-05-11 10:21:42 UTC");
    }

    #[test]
    fn rejects_invalid_timestamp() {
        assert!(parse_spot_timestamp("yesterday").is_none());
    }
}
