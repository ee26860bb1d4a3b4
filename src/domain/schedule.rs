//! Parsing of calendar dates and times of day from request payloads.

use chrono::{DateTime, NaiveDate, NaiveTime};

use crate::errors::{AppError, AppResult};

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(field: &str, value: &str) -> AppResult<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| AppError::validation(format!("{} must be a date in YYYY-MM-DD format", field)))
}

/// Parse a time of day: `HH:MM`, `HH:MM:SS`, or the time part of an RFC 3339 timestamp.
pub fn parse_time(field: &str, value: &str) -> AppResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.time()))
        .map_err(|_| AppError::validation(format!("{} must be a time in HH:MM format", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("booking_date", "2024-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert!(parse_date("booking_date", "01/06/2024").is_err());
        assert!(parse_date("booking_date", "2024-02-30").is_err());
    }

    #[test]
    fn test_parse_time_formats() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(parse_time("t", "09:00").unwrap(), nine);
        assert_eq!(parse_time("t", "09:00:00").unwrap(), nine);
        assert_eq!(parse_time("t", "2024-06-01T09:00:00Z").unwrap(), nine);
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        let err = parse_time("booking_time", "nine o'clock").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("booking_time")));
        assert!(parse_time("t", "25:00").is_err());
    }
}
