//! `date_entered` normalization.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

// Naive layouts seen in PSA exports; read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a timestamp cell into UTC.
///
/// Returns `None` for blank or unrecognized values; callers must not place
/// such rows in any window.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_rfc3339_with_offset() {
        assert_eq!(
            parse_timestamp("2024-05-01T11:30:00+02:00"),
            Some(utc(2024, 5, 1, 9, 30, 0))
        );
    }

    #[test]
    fn test_naive_layouts_are_utc() {
        let expected = Some(utc(2024, 5, 1, 9, 30, 15));
        assert_eq!(parse_timestamp("2024-05-01 09:30:15"), expected);
        assert_eq!(parse_timestamp("2024-05-01T09:30:15"), expected);
        assert_eq!(parse_timestamp("05/01/2024 09:30:15"), expected);
        assert_eq!(
            parse_timestamp("2024-05-01 09:30"),
            Some(utc(2024, 5, 1, 9, 30, 0))
        );
        assert_eq!(
            parse_timestamp("05/01/2024 9:30 PM"),
            Some(utc(2024, 5, 1, 21, 30, 0))
        );
    }

    #[test]
    fn test_fractional_seconds() {
        let parsed = parse_timestamp("2024-05-01 09:30:15.250").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_date_only_is_midnight() {
        assert_eq!(parse_timestamp("2024-05-01"), Some(utc(2024, 5, 1, 0, 0, 0)));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-45 99:99"), None);
    }
}
