// Date utility functions
// Conversions between wall-clock times and fractional hours

use chrono::{NaiveTime, Timelike};

/// Number of hours in a displayed day.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Fractional hour of the day for a wall-clock time (09:30 -> 9.5).
pub fn hour_of(time: NaiveTime) -> f64 {
    time.hour() as f64 + time.minute() as f64 / 60.0 + time.second() as f64 / 3600.0
}

/// Wall-clock time for a fractional hour, rounded to the nearest minute.
///
/// Values at or beyond 24:00 clamp to 23:59 of the same day and negative
/// values clamp to midnight, so the result never rolls into another day.
pub fn time_from_hour(hour: f64) -> NaiveTime {
    let total_minutes = (hour * 60.0).round() as i64;
    if total_minutes >= 24 * 60 {
        return last_minute_of_day();
    }
    let total_minutes = total_minutes.max(0) as u32;
    NaiveTime::from_hms_opt(total_minutes / 60, total_minutes % 60, 0).unwrap_or(NaiveTime::MIN)
}

/// 23:59, the latest persisted end time for an event on its own day.
pub fn last_minute_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

/// `HH:MM` label for a time.
pub fn format_hm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// `H:00` label for a whole hour, matching the hour gutter.
pub fn format_hour_label(hour: u32) -> String {
    format!("{}:00", hour)
}
