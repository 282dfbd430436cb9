use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{self, Result};

use crate::models::event::EventPeriod;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn format_datetime(value: Option<NaiveDateTime>) -> Option<String> {
    value.map(|dt| dt.format(DATETIME_FORMAT).to_string())
}

pub(crate) fn parse_date(column: usize, value: String) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&value, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Stored instants are naive; a space separator from older rows is accepted too.
pub(crate) fn parse_datetime(column: usize, value: Option<String>) -> Result<Option<NaiveDateTime>> {
    let Some(value) = value else {
        return Ok(None);
    };

    NaiveDateTime::parse_from_str(&value, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(&value, "%Y-%m-%d %H:%M:%S"))
        .map(Some)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Unknown period strings are dropped; such events render in the morning slot.
pub(crate) fn parse_period(value: Option<String>) -> Option<EventPeriod> {
    value.and_then(|period| period.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_datetime_text_format() {
        let dt = NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        let text = format_datetime(Some(dt)).unwrap();
        assert_eq!(text, "2025-06-02T09:30:00");
        assert_eq!(parse_datetime(0, Some(text)).unwrap(), Some(dt));
    }

    #[test]
    fn test_space_separated_datetime_accepted() {
        let parsed = parse_datetime(0, Some("2025-06-02 14:00:00".to_string())).unwrap();
        assert_eq!(parsed.unwrap().to_string(), "2025-06-02 14:00:00");
    }

    #[test]
    fn test_bad_datetime_is_conversion_error() {
        assert!(parse_datetime(3, Some("tomorrow".to_string())).is_err());
        assert!(parse_date(2, "02/06/2025".to_string()).is_err());
    }

    #[test]
    fn test_unknown_period_dropped() {
        assert_eq!(parse_period(Some("evening".to_string())), None);
        assert_eq!(parse_period(Some("afternoon".to_string())), Some(EventPeriod::Afternoon));
        assert_eq!(parse_period(None), None);
    }
}
