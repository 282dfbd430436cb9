//! Coordinate transform between time of day and vertical canvas position.

use crate::models::settings::TimelineSettings;
use crate::utils::date::format_hour_label;

/// Default snap granularity for drags, in minutes.
pub const DEFAULT_SNAP_MINUTES: u32 = 15;

/// Gutter label for one visible hour.
#[derive(Debug, Clone, PartialEq)]
pub struct HourLabel {
    pub hour: u32,
    pub y: f64,
    pub text: String,
}

/// Linear mapping of hours onto pixels for a closed-open visible window.
///
/// Hours outside the window still map to (off-canvas) coordinates; clamping
/// to the canvas is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAxis {
    first_visible_hour: f64,
    last_visible_hour: f64,
    pixels_per_hour: f64,
}

impl TimeAxis {
    pub fn new(first_visible_hour: u32, last_visible_hour: u32, pixels_per_hour: f64) -> Self {
        Self {
            first_visible_hour: first_visible_hour as f64,
            last_visible_hour: last_visible_hour as f64,
            pixels_per_hour,
        }
    }

    pub fn from_settings(settings: &TimelineSettings) -> Self {
        Self::new(
            settings.first_visible_hour,
            settings.last_visible_hour,
            settings.pixels_per_hour,
        )
    }

    pub fn first_visible_hour(&self) -> f64 {
        self.first_visible_hour
    }

    pub fn last_visible_hour(&self) -> f64 {
        self.last_visible_hour
    }

    pub fn pixels_per_hour(&self) -> f64 {
        self.pixels_per_hour
    }

    pub fn time_to_y(&self, hour: f64) -> f64 {
        (hour - self.first_visible_hour) * self.pixels_per_hour
    }

    pub fn y_to_time(&self, y: f64) -> f64 {
        self.first_visible_hour + y / self.pixels_per_hour
    }

    /// Pixel length of a duration in hours.
    pub fn hours_to_pixels(&self, hours: f64) -> f64 {
        hours * self.pixels_per_hour
    }

    /// Height of the whole visible window.
    pub fn total_height(&self) -> f64 {
        self.hours_to_pixels(self.last_visible_hour - self.first_visible_hour)
    }

    pub fn contains(&self, hour: f64) -> bool {
        hour >= self.first_visible_hour && hour < self.last_visible_hour
    }

    /// Round `hour` to the nearest multiple of `increment_minutes`.
    pub fn snap(hour: f64, increment_minutes: u32) -> f64 {
        let increment = increment_minutes.max(1) as f64 / 60.0;
        (hour / increment).round() * increment
    }

    /// Round a pixel offset to the nearest pixel step of `increment_minutes`.
    pub fn snap_y(&self, y: f64, increment_minutes: u32) -> f64 {
        let step = self.hours_to_pixels(increment_minutes.max(1) as f64 / 60.0);
        (y / step).round() * step
    }

    pub fn hour_labels(&self) -> Vec<HourLabel> {
        let first = self.first_visible_hour.ceil() as u32;
        let last = self.last_visible_hour.ceil() as u32;
        (first..last)
            .map(|hour| HourLabel {
                hour,
                y: self.time_to_y(hour as f64),
                text: format_hour_label(hour),
            })
            .collect()
    }
}

impl Default for TimeAxis {
    fn default() -> Self {
        Self::from_settings(&TimelineSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(6.0, 0.0 ; "window start")]
    #[test_case(9.0, 144.0 ; "nine o'clock")]
    #[test_case(14.5, 408.0 ; "half past two")]
    #[test_case(24.0, 864.0 ; "window end")]
    fn test_time_to_y(hour: f64, y: f64) {
        let axis = TimeAxis::default();
        assert_eq!(axis.time_to_y(hour), y);
        assert_eq!(axis.y_to_time(y), hour);
    }

    #[test]
    fn test_out_of_window_is_computable() {
        let axis = TimeAxis::default();
        assert_eq!(axis.time_to_y(5.0), -48.0);
        assert!(!axis.contains(5.0));
        assert!(!axis.contains(24.0));
        assert!(axis.contains(6.0));
    }

    #[test_case(9.1, 15, 9.0 ; "rounds down")]
    #[test_case(9.2, 15, 9.25 ; "rounds up")]
    #[test_case(14.0 + 10.0 / 60.0, 30, 14.0 ; "half hour grid")]
    #[test_case(14.0 + 20.0 / 60.0, 30, 14.5 ; "half hour grid up")]
    fn test_snap(hour: f64, minutes: u32, expected: f64) {
        assert!((TimeAxis::snap(hour, minutes) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_snap_y_uses_quarter_hour_step() {
        let axis = TimeAxis::default();
        assert_eq!(axis.snap_y(17.0, 15), 12.0);
        assert_eq!(axis.snap_y(245.0, 15), 240.0);
    }

    #[test]
    fn test_total_height_and_labels() {
        let axis = TimeAxis::default();
        assert_eq!(axis.total_height(), 18.0 * 48.0);

        let labels = axis.hour_labels();
        assert_eq!(labels.len(), 18);
        assert_eq!(labels[0].text, "6:00");
        assert_eq!(labels[0].y, 0.0);
        assert_eq!(labels[17].text, "23:00");
    }
}
