use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Validate that `tz_name` is a recognised IANA timezone identifier.
pub fn validate_timezone(tz_name: &str) -> bool {
    tz_name.parse::<Tz>().is_ok()
}

/// Parse `tz_name`, falling back to UTC with a warning when it is unknown.
pub fn resolve_timezone(tz_name: &str) -> Tz {
    tz_name.parse::<Tz>().unwrap_or_else(|_| {
        warn!(
            "Unrecognised timezone \"{}\", falling back to UTC",
            tz_name
        );
        Tz::UTC
    })
}

// ── "Today" ───────────────────────────────────────────────────────────────────

/// Calendar date of `now` as seen in `tz_name`.
pub fn date_in_timezone(now: DateTime<Utc>, tz_name: &str) -> NaiveDate {
    now.with_timezone(&resolve_timezone(tz_name)).date_naive()
}

/// Today's calendar date in `tz_name`.
pub fn today_in(tz_name: &str) -> NaiveDate {
    date_in_timezone(Utc::now(), tz_name)
}

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Naive layouts tried after RFC 3339, most specific first.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a log timestamp into its wall-clock reading.
///
/// Offset-carrying values (`Z`, `+02:00`) keep their local time rather than
/// being shifted to UTC, so the hour of day matches what was written.
/// A bare `YYYY-MM-DD` is midnight. Returns `None` for empty or unrecognised
/// input.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    // RFC 3339 with a space separator, e.g. "2024-01-05 10:00:00+00:00".
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_get_system_timezone_not_empty() {
        assert!(!get_system_timezone().is_empty());
    }

    #[test]
    fn test_validate_timezone() {
        assert!(validate_timezone("UTC"));
        assert!(validate_timezone("Asia/Jakarta"));
        assert!(!validate_timezone("Not/AZone"));
    }

    #[test]
    fn test_resolve_timezone_falls_back_to_utc() {
        assert_eq!(resolve_timezone("Nowhere/Special"), Tz::UTC);
        assert_eq!(resolve_timezone("Europe/Berlin"), Tz::Europe__Berlin);
    }

    #[test]
    fn test_date_in_timezone_crosses_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 20, 0, 0).unwrap();
        assert_eq!(
            date_in_timezone(now, "UTC"),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
        assert_eq!(
            date_in_timezone(now, "Asia/Tokyo"),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_timestamp_space_separated() {
        let ts = parse_timestamp("2025-02-06 11:31:07").unwrap();
        assert_eq!(ts.hour(), 11);
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2025, 2, 6).unwrap());
    }

    #[test]
    fn test_parse_timestamp_fractional_and_t_separator() {
        assert!(parse_timestamp("2025-02-06 11:31:07.250").is_some());
        assert!(parse_timestamp("2025-02-06T11:31:07").is_some());
        assert!(parse_timestamp("2025-02-06T11:31").is_some());
    }

    #[test]
    fn test_parse_timestamp_keeps_wall_clock_of_offset() {
        let ts = parse_timestamp("2025-02-06T23:30:00+07:00").unwrap();
        assert_eq!(ts.hour(), 23);
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2025, 2, 6).unwrap());

        let z = parse_timestamp("2025-02-06T08:00:00Z").unwrap();
        assert_eq!(z.hour(), 8);

        let spaced = parse_timestamp("2025-02-06 05:00:00+00:00").unwrap();
        assert_eq!(spaced.hour(), 5);
    }

    #[test]
    fn test_parse_timestamp_bare_date_is_midnight() {
        let ts = parse_timestamp("2025-02-06").unwrap();
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2025-13-01").is_none());
    }
}
