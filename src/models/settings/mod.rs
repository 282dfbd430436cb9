// Settings module
// Timeline geometry, gesture thresholds and collaborator endpoints

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// User-tunable timeline settings, persisted as TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// First hour drawn on the axis (inclusive)
    pub first_visible_hour: u32,
    /// Last hour drawn on the axis (exclusive)
    pub last_visible_hour: u32,
    pub pixels_per_hour: f64,
    /// Minimum rendered height so short events stay clickable
    pub min_event_height: f64,
    pub drag_snap_minutes: u32,
    pub tap_snap_minutes: u32,
    /// Longest press still treated as a tap
    pub tap_max_millis: u64,
    /// Largest vertical travel still treated as a tap
    pub tap_max_distance: f64,
    /// How long a finished drag suppresses taps
    pub drag_guard_millis: u64,
    pub now_tick_secs: u64,
    pub database_path: Option<PathBuf>,
    pub sync_webhook_url: Option<String>,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            first_visible_hour: 6,
            last_visible_hour: 24,
            pixels_per_hour: 48.0,
            min_event_height: 24.0,
            drag_snap_minutes: 15,
            tap_snap_minutes: 30,
            tap_max_millis: 500,
            tap_max_distance: 10.0,
            drag_guard_millis: 300,
            now_tick_secs: 60,
            database_path: None,
            sync_webhook_url: None,
        }
    }
}

impl TimelineSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.last_visible_hour > 24 {
            return Err("Last visible hour must be at most 24".to_string());
        }
        if self.first_visible_hour >= self.last_visible_hour {
            return Err("Visible hour window must not be empty".to_string());
        }
        if !(self.pixels_per_hour.is_finite() && self.pixels_per_hour > 0.0) {
            return Err("Pixels per hour must be positive".to_string());
        }
        if !(self.min_event_height.is_finite() && self.min_event_height >= 0.0) {
            return Err("Minimum event height must not be negative".to_string());
        }
        if self.drag_snap_minutes == 0 || self.tap_snap_minutes == 0 {
            return Err("Snap increments must be at least one minute".to_string());
        }
        if self.now_tick_secs == 0 {
            return Err("Current time tick must be at least one second".to_string());
        }
        Ok(())
    }

    pub fn tap_max_elapsed(&self) -> Duration {
        Duration::from_millis(self.tap_max_millis)
    }

    pub fn drag_guard(&self) -> Duration {
        Duration::from_millis(self.drag_guard_millis)
    }

    pub fn now_tick(&self) -> Duration {
        Duration::from_secs(self.now_tick_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = TimelineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.first_visible_hour, 6);
        assert_eq!(settings.last_visible_hour, 24);
        assert_eq!(settings.pixels_per_hour, 48.0);
        assert_eq!(settings.tap_max_elapsed(), Duration::from_millis(500));
    }

    #[test]
    fn test_empty_window_rejected() {
        let settings = TimelineSettings {
            first_visible_hour: 10,
            last_visible_hour: 10,
            ..TimelineSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_window_past_midnight_rejected() {
        let settings = TimelineSettings {
            last_visible_hour: 25,
            ..TimelineSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_density_rejected() {
        let settings = TimelineSettings {
            pixels_per_hour: 0.0,
            ..TimelineSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_snap_rejected() {
        let settings = TimelineSettings {
            drag_snap_minutes: 0,
            ..TimelineSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
