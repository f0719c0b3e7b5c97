//! Time utility functions

use chrono::{DateTime, FixedOffset, NaiveDate};

/// Tracker timestamp layout, e.g. `2024-01-15T10:30:00.000-0300`
const TRACKER_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Parse a tracker timestamp, keeping its own UTC offset.
///
/// Accepts the tracker's native layout (offset without colon) and RFC 3339.
pub fn parse_tracker_timestamp(ts: &str) -> Option<DateTime<FixedOffset>> {
    let ts = ts.trim();
    DateTime::parse_from_str(ts, TRACKER_TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(ts))
        .ok()
}

/// Parse a tracker timestamp, falling back to the Unix epoch when it is missing or invalid
pub fn parse_tracker_timestamp_or_epoch(ts: Option<&str>) -> DateTime<FixedOffset> {
    ts.and_then(parse_tracker_timestamp).unwrap_or_else(|| {
        tracing::warn!(ts = ?ts, "Invalid tracker timestamp, using epoch");
        DateTime::UNIX_EPOCH.fixed_offset()
    })
}

/// Parse an ISO calendar date (`YYYY-MM-DD`)
pub fn parse_iso_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_tracker_native_format() {
        let dt = parse_tracker_timestamp("2024-01-15T10:30:00.000-0300").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.offset().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn test_parse_tracker_rfc3339() {
        let dt = parse_tracker_timestamp("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.offset().local_minus_utc(), 0);

        let dt = parse_tracker_timestamp("2024-01-15T10:30:00+05:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 5 * 3600);
    }

    #[test]
    fn test_parse_tracker_keeps_local_date() {
        // 23:30 at -03:00 is already the next day in UTC; the local date wins
        let dt = parse_tracker_timestamp("2024-01-31T23:30:00.000-0300").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[test]
    fn test_parse_tracker_invalid() {
        assert!(parse_tracker_timestamp("not-a-timestamp").is_none());
        assert!(parse_tracker_timestamp("").is_none());
    }

    #[test]
    fn test_epoch_fallback() {
        let dt = parse_tracker_timestamp_or_epoch(Some("garbage"));
        assert_eq!(dt.timestamp(), 0);
        let dt = parse_tracker_timestamp_or_epoch(None);
        assert_eq!(dt.timestamp(), 0);
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date("2024-06-01"),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert!(parse_iso_date("2024-13-01").is_none());
        assert!(parse_iso_date("01/06/2024").is_none());
    }
}
