//! Tap versus drag/scroll on the empty timeline background.

use std::time::{Duration, Instant};

use crate::models::settings::TimelineSettings;

/// Limits that separate a tap from any other gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapThresholds {
    pub max_elapsed: Duration,
    pub max_distance: f64,
    /// How long a finished drag suppresses taps
    pub drag_guard: Duration,
}

impl TapThresholds {
    pub fn from_settings(settings: &TimelineSettings) -> Self {
        Self {
            max_elapsed: settings.tap_max_elapsed(),
            max_distance: settings.tap_max_distance,
            drag_guard: settings.drag_guard(),
        }
    }
}

impl Default for TapThresholds {
    fn default() -> Self {
        Self::from_settings(&TimelineSettings::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    ArmedForTap { y: f64, at: Instant },
    Dragging,
    CooldownAfterDrag { until: Instant },
}

/// Classifies background presses. A press arms a tap; the matching release
/// fires it only if it was short, still, and not claimed by a drag.
#[derive(Debug, Clone)]
pub struct EmptyAreaGestureClassifier {
    thresholds: TapThresholds,
    state: GestureState,
}

impl EmptyAreaGestureClassifier {
    pub fn new(thresholds: TapThresholds) -> Self {
        Self {
            thresholds,
            state: GestureState::Idle,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    fn guard_active(&self, now: Instant) -> bool {
        matches!(self.state, GestureState::CooldownAfterDrag { until } if now < until)
    }

    /// Record a press on the background. Returns whether a tap is now armed.
    pub fn pointer_down(&mut self, y: f64, at: Instant, dialog_open: bool) -> bool {
        if dialog_open || self.guard_active(at) || self.state == GestureState::Dragging {
            return false;
        }

        self.state = GestureState::ArmedForTap { y, at };
        true
    }

    /// An event drag has taken over the pointer.
    pub fn drag_started(&mut self) {
        self.state = GestureState::Dragging;
    }

    /// A drag ended; suppress taps for the guard window.
    pub fn drag_finished(&mut self, at: Instant) {
        self.state = GestureState::CooldownAfterDrag {
            until: at + self.thresholds.drag_guard,
        };
    }

    /// Classify a release. Returns the press position when it was a tap.
    pub fn pointer_up(
        &mut self,
        y: f64,
        at: Instant,
        over_event: bool,
        dialog_open: bool,
    ) -> Option<f64> {
        let state = self.state;
        self.state = match state {
            GestureState::CooldownAfterDrag { until } if at < until => state,
            GestureState::Dragging => state,
            _ => GestureState::Idle,
        };

        let GestureState::ArmedForTap { y: down_y, at: down_at } = state else {
            return None;
        };
        if over_event || dialog_open {
            return None;
        }

        let elapsed = at.saturating_duration_since(down_at);
        let travel = (y - down_y).abs();
        if elapsed < self.thresholds.max_elapsed && travel < self.thresholds.max_distance {
            Some(down_y)
        } else {
            log::debug!(
                "Background press not a tap ({} ms, {:.1} px)",
                elapsed.as_millis(),
                travel
            );
            None
        }
    }

    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }
}

impl Default for EmptyAreaGestureClassifier {
    fn default() -> Self {
        Self::new(TapThresholds::default())
    }
}
