//! Lenient field extraction from decoded status maps.
//!
//! Absent or malformed values fall back to a default instead of failing; callers that
//! need a field to be present check for it before building a record.

use std::{collections::HashMap, time::Duration};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Returns the value for `key`, or an empty string when absent.
pub fn string_field(map: &HashMap<String, String>, key: &str) -> String {
    map.get(key).cloned().unwrap_or_default()
}

/// A flag is set only when its value is exactly `"1"`.
pub fn flag_field(map: &HashMap<String, String>, key: &str) -> bool {
    map.get(key).is_some_and(|value| value == "1")
}

/// Parses an integer field, defaulting to `-1`.
pub fn int_field(map: &HashMap<String, String>, key: &str) -> i64 {
    map.get(key)
        .and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(-1)
}

/// Parses whole seconds into a duration, defaulting to zero.
///
/// Negative values are treated the same as missing ones.
pub fn seconds_field(map: &HashMap<String, String>, key: &str) -> Duration {
    map.get(key)
        .and_then(|value| parse_seconds(value))
        .unwrap_or_default()
}

/// Parses fractional seconds (always `.` as the decimal separator) into a duration.
pub fn fractional_seconds_field(map: &HashMap<String, String>, key: &str) -> Duration {
    map.get(key)
        .and_then(|value| value.trim().parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or_default()
}

/// Parses a timestamp field, defaulting to the minimum representable time.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and a bare `YYYY-MM-DD`; naive values
/// are taken as UTC.
pub fn timestamp_field(map: &HashMap<String, String>, key: &str) -> DateTime<Utc> {
    map.get(key)
        .and_then(|value| parse_timestamp(value))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Parses a non-negative whole number of seconds.
pub fn parse_seconds(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Tests flag parsing.
    ///
    /// Verifies that only the exact string "1" counts as set.
    ///
    /// Expected: true for "1", false for "true", "0" and missing keys
    #[test]
    fn flag_requires_exact_one() {
        let fields = map(&[("a", "1"), ("b", "true"), ("c", "0")]);

        assert!(flag_field(&fields, "a"));
        assert!(!flag_field(&fields, "b"));
        assert!(!flag_field(&fields, "c"));
        assert!(!flag_field(&fields, "missing"));
    }

    /// Tests integer defaults.
    ///
    /// Verifies that absent and malformed integers fall back to -1.
    ///
    /// Expected: parsed value when valid, -1 otherwise
    #[test]
    fn int_defaults_to_minus_one() {
        let fields = map(&[("players", "12"), ("admins", "many")]);

        assert_eq!(int_field(&fields, "players"), 12);
        assert_eq!(int_field(&fields, "admins"), -1);
        assert_eq!(int_field(&fields, "popcap"), -1);
    }

    /// Tests fractional second parsing.
    ///
    /// Verifies that dot-separated decimals convert to durations and that negative or
    /// malformed values become zero.
    ///
    /// Expected: 1.5 -> 1500ms, "-2" and "1,5" -> zero
    #[test]
    fn fractional_seconds() {
        let fields = map(&[("a", "1.5"), ("b", "-2"), ("c", "1,5")]);

        assert_eq!(fractional_seconds_field(&fields, "a"), Duration::from_millis(1500));
        assert_eq!(fractional_seconds_field(&fields, "b"), Duration::ZERO);
        assert_eq!(fractional_seconds_field(&fields, "c"), Duration::ZERO);
    }

    /// Tests timestamp parsing.
    ///
    /// Verifies the accepted formats and the minimum-time fallback.
    ///
    /// Expected: all three formats parse, garbage yields MIN_UTC
    #[test]
    fn timestamps() {
        let fields = map(&[
            ("rfc", "2024-03-01T12:30:00Z"),
            ("plain", "2024-03-01 12:30:00"),
            ("date", "2024-03-01"),
            ("bad", "yesterday"),
        ]);

        assert_eq!(timestamp_field(&fields, "rfc"), timestamp_field(&fields, "plain"));
        assert_eq!(
            timestamp_field(&fields, "date").format("%Y-%m-%d %H:%M").to_string(),
            "2024-03-01 00:00"
        );
        assert_eq!(timestamp_field(&fields, "bad"), DateTime::<Utc>::MIN_UTC);
    }
}
