//! Calendar-day matching.
//!
//! The backend mixes date-only strings ("2024-03-01") with full timestamps
//! ("2024-03-01T07:45:00Z") for the same fields, so everything here
//! normalizes to the calendar day before comparing. Unparseable input is
//! never an error; it just doesn't match.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a backend date string down to its calendar day.
/// Accepts RFC 3339 timestamps, bare timestamps, and date-only strings.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    parse_day_and_time(s)
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

/// Parse a backend timestamp, keeping the time of day.
/// Offset-carrying timestamps resolve to the day in their embedded
/// offset, not the machine's zone, so matching stays deterministic
/// wherever the client runs.
pub fn parse_day_and_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok())
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok())
}

/// True when both strings name the same calendar day, regardless of any
/// embedded time of day. Unparseable input compares unequal.
pub fn is_same_day(a: &str, b: &str) -> bool {
    match (parse_day(a), parse_day(b)) {
        (Some(da), Some(db)) => da == db,
        _ => false,
    }
}

/// True when `day` falls within [start, end], inclusive both ends
pub fn in_range(day: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    start <= day && day <= end
}

/// String form of `in_range`: all three normalized to calendar days first.
/// Any unparseable input means no match.
pub fn is_in_range(day: &str, start: &str, end: &str) -> bool {
    match (parse_day(day), parse_day(start), parse_day(end)) {
        (Some(d), Some(s), Some(e)) => in_range(d, s, e),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(parse_day("2024-03-01"), expected);
        assert_eq!(parse_day("2024-03-01T07:45:00"), expected);
        assert_eq!(parse_day("2024-03-01T07:45:00Z"), expected);
        assert_eq!(parse_day("2024-03-01 07:45:00"), expected);
        assert_eq!(parse_day("  2024-03-01 "), expected);
        assert_eq!(parse_day("not-a-date"), None);
        assert_eq!(parse_day(""), None);
    }

    #[test]
    fn test_parse_day_uses_embedded_offset() {
        // 2024-03-01T01:30+05:00 is still Feb 29 in UTC; the day comes
        // from the timestamp's own offset regardless of machine zone
        assert_eq!(
            parse_day("2024-03-01T01:30:00+05:00"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn test_same_day_ignores_time_of_day() {
        assert!(is_same_day("2024-03-01T23:59:00", "2024-03-01"));
        assert!(is_same_day("2024-03-01", "2024-03-01T00:00:01Z"));
        assert!(!is_same_day("2024-03-01T23:59:00", "2024-03-02T00:00:01"));
    }

    #[test]
    fn test_same_day_reflexive_and_symmetric() {
        assert!(is_same_day("2024-03-01", "2024-03-01"));
        assert_eq!(
            is_same_day("2024-03-01T10:00:00", "2024-03-01"),
            is_same_day("2024-03-01", "2024-03-01T10:00:00")
        );
    }

    #[test]
    fn test_same_day_invalid_never_matches() {
        assert!(!is_same_day("garbage", "2024-03-01"));
        assert!(!is_same_day("2024-03-01", "garbage"));
        // Two identical garbage strings are still not "the same day"
        assert!(!is_same_day("garbage", "garbage"));
    }

    #[test]
    fn test_in_range_inclusive_both_ends() {
        assert!(is_in_range("2024-03-01", "2024-03-01", "2024-03-31"));
        assert!(is_in_range("2024-03-31", "2024-03-01", "2024-03-31"));
        assert!(is_in_range("2024-03-15T12:00:00", "2024-03-01", "2024-03-31"));
        assert!(!is_in_range("2024-04-01", "2024-03-01", "2024-03-31"));
        assert!(!is_in_range("2024-02-29", "2024-03-01", "2024-03-31"));
    }

    #[test]
    fn test_single_day_range_contains_itself() {
        assert!(is_in_range("2024-03-01", "2024-03-01", "2024-03-01"));
    }

    #[test]
    fn test_in_range_invalid_input() {
        assert!(!is_in_range("garbage", "2024-03-01", "2024-03-31"));
        assert!(!is_in_range("2024-03-15", "", "2024-03-31"));
        assert!(!is_in_range("2024-03-15", "2024-03-01", "nope"));
    }
}
