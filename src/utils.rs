/// Utility functions for timestamp handling and display formatting
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::models::MetricSummary;

/// Placeholder shown for an absent metric value.
pub const PLACEHOLDER: &str = "N/A";

/// Format a timestamp for human-readable display
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    let format = format_description!("[day].[month].[year] - [hour]:[minute]:[second]");
    dt.format(format).unwrap_or_else(|_| dt.to_string())
}

/// Parse an ISO-8601 instant.
///
/// RFC 3339 strings keep their offset. Date-times without an offset and bare
/// dates are read as UTC, a bare date as its midnight.
pub fn parse_instant(value: &str) -> Option<OffsetDateTime> {
    if let Ok(dt) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(dt);
    }

    let naive = PrimitiveDateTime::parse(
        value,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )
    })
    .or_else(|_| {
        PrimitiveDateTime::parse(value, format_description!("[year]-[month]-[day]T[hour]:[minute]"))
    })
    .or_else(|_| {
        Date::parse(value, format_description!("[year]-[month]-[day]")).map(Date::midnight)
    })
    .ok()?;

    Some(naive.assume_utc())
}

/// Render an instant in the canonical UTC form `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn to_iso_string(dt: OffsetDateTime) -> Option<String> {
    let format =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");
    dt.to_offset(UtcOffset::UTC).format(format).ok()
}

/// Convert epoch milliseconds into the canonical ISO-8601 string.
///
/// Fractional milliseconds are truncated. Returns None for non-finite or
/// out-of-range values.
pub fn epoch_millis_to_iso(millis: f64) -> Option<String> {
    if !millis.is_finite() {
        return None;
    }
    let nanos = (millis.trunc() as i128).checked_mul(1_000_000)?;
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?;
    to_iso_string(dt)
}

/// Short `HH:MM` axis label for a series timestamp.
///
/// Keys that are not parseable instants are shown verbatim.
pub fn format_time_label(timestamp: &str) -> String {
    let format = format_description!("[hour]:[minute]");
    parse_instant(timestamp)
        .and_then(|dt| dt.format(format).ok())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Long form of a series timestamp for the "Last updated" line.
pub fn format_timestamp(timestamp: &str) -> String {
    parse_instant(timestamp)
        .map(|dt| format_datetime(&dt))
        .unwrap_or_else(|| timestamp.to_string())
}

/// One decimal place plus unit, or the placeholder when absent.
pub fn format_value(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.1}{}", v, unit),
        None => PLACEHOLDER.to_string(),
    }
}

/// `min - max` range for a stat card.
pub fn format_range(summary: Option<MetricSummary>, unit: &str) -> String {
    match summary {
        Some(s) => format!("{:.1}{unit} - {:.1}{unit}", s.min, s.max, unit = unit),
        None => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_millis_to_iso() {
        assert_eq!(
            epoch_millis_to_iso(0.0).as_deref(),
            Some("1970-01-01T00:00:00.000Z")
        );
        assert_eq!(
            epoch_millis_to_iso(1_700_000_000_123.9).as_deref(),
            Some("2023-11-14T22:13:20.123Z")
        );
        assert_eq!(epoch_millis_to_iso(f64::NAN), None);
        assert_eq!(epoch_millis_to_iso(f64::INFINITY), None);
        assert_eq!(epoch_millis_to_iso(1e300), None);
    }

    #[test]
    fn test_iso_normalises_offsets() {
        let dt = parse_instant("2024-03-01T12:30:00+02:00").unwrap();
        assert_eq!(to_iso_string(dt).as_deref(), Some("2024-03-01T10:30:00.000Z"));
        assert!(parse_instant("bad").is_none());
    }

    #[test]
    fn test_offsetless_forms_read_as_utc() {
        let expect = |value: &str| parse_instant(value).and_then(to_iso_string);

        assert_eq!(
            expect("2024-05-01T10:00:00").as_deref(),
            Some("2024-05-01T10:00:00.000Z")
        );
        assert_eq!(
            expect("2024-05-01T10:00:00.25").as_deref(),
            Some("2024-05-01T10:00:00.250Z")
        );
        assert_eq!(expect("2024-05-01T10:00").as_deref(), Some("2024-05-01T10:00:00.000Z"));
        assert_eq!(expect("2024-05-01").as_deref(), Some("2024-05-01T00:00:00.000Z"));
        assert!(parse_instant("2024-13-01").is_none());
        assert!(parse_instant("t1").is_none());
    }

    #[test]
    fn test_format_time_label() {
        assert_eq!(format_time_label("2024-03-01T09:05:59.000Z"), "09:05");
        assert_eq!(format_time_label("t1"), "t1");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp("2024-03-01T09:05:59.000Z"),
            "01.03.2024 - 09:05:59"
        );
    }

    #[test]
    fn test_format_value_and_range() {
        assert_eq!(format_value(Some(23.14), "°C"), "23.1°C");
        assert_eq!(format_value(None, "%"), PLACEHOLDER);

        let summary = MetricSummary {
            current: 23.1,
            min: 21.2,
            max: 23.1,
        };
        assert_eq!(format_range(Some(summary), "°C"), "21.2°C - 23.1°C");
        assert_eq!(format_range(None, "°C"), "N/A");
    }
}
