//! One drag-to-reschedule gesture, from press on an event box to release.

use chrono::NaiveDateTime;

use super::listeners::{ListenerHandle, SurfaceListeners};
use super::time_axis::TimeAxis;
use crate::models::event::TimedEvent;
use crate::utils::date::{time_from_hour, HOURS_PER_DAY};

/// Moves shorter than this many minutes are treated as accidental.
pub const MIN_RESCHEDULE_MINUTES: f64 = 15.0;

/// A committed move, ready to be written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Reschedule {
    pub event: TimedEvent,
    pub new_start: NaiveDateTime,
    pub new_end: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    Discarded,
    Committed(Reschedule),
}

/// Live drag state. Holding a session means the surface listeners are attached;
/// finishing or dropping it detaches them.
#[derive(Debug)]
pub struct DragRescheduleSession {
    event: TimedEvent,
    axis: TimeAxis,
    snap_minutes: u32,
    pointer_start_y: f64,
    original_top: f64,
    duration_hours: f64,
    current_top: f64,
    listener: ListenerHandle,
}

impl DragRescheduleSession {
    /// Begin dragging `event`. All-day events cannot be dragged on the axis.
    pub fn start(
        event: &TimedEvent,
        pointer_y: f64,
        axis: TimeAxis,
        snap_minutes: u32,
        listeners: &SurfaceListeners,
    ) -> Option<Self> {
        let (start_hour, end_hour) = event.hour_span()?;
        let original_top = axis.time_to_y(start_hour);

        Some(Self {
            event: event.clone(),
            axis,
            snap_minutes,
            pointer_start_y: pointer_y,
            original_top,
            duration_hours: end_hour - start_hour,
            current_top: original_top,
            listener: listeners.attach(),
        })
    }

    pub fn event(&self) -> &TimedEvent {
        &self.event
    }

    pub fn event_id(&self) -> &str {
        &self.event.id
    }

    pub fn pointer_start_y(&self) -> f64 {
        self.pointer_start_y
    }

    pub fn original_top(&self) -> f64 {
        self.original_top
    }

    pub fn current_top(&self) -> f64 {
        self.current_top
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_hours
    }

    pub fn height(&self) -> f64 {
        self.axis.hours_to_pixels(self.duration_hours)
    }

    /// Highest top the box may reach while staying inside the canvas.
    fn max_top(&self) -> f64 {
        (self.axis.total_height() - self.height()).max(0.0)
    }

    /// Track the pointer: snap the raw offset to the grid, then keep it on the canvas.
    pub fn pointer_moved(&mut self, pointer_y: f64) -> f64 {
        let raw_top = self.original_top + (pointer_y - self.pointer_start_y);
        let snapped = self.axis.snap_y(raw_top, self.snap_minutes);
        self.current_top = snapped.max(0.0).min(self.max_top());
        self.current_top
    }

    /// Start hour the box would land on if released now.
    pub fn preview_start_hour(&self) -> f64 {
        self.axis.y_to_time(self.current_top)
    }

    pub fn preview_end_hour(&self) -> f64 {
        (self.preview_start_hour() + self.duration_hours).min(HOURS_PER_DAY)
    }

    /// End the gesture. Listeners are detached before the outcome is decided.
    pub fn finish(self) -> DragOutcome {
        let Self {
            event,
            axis,
            original_top,
            current_top,
            duration_hours,
            listener,
            ..
        } = self;
        listener.detach();

        let original_hour = axis.y_to_time(original_top);
        let new_start_hour = axis.y_to_time(current_top);
        // Compared unrounded; the epsilon only absorbs float noise from the axis.
        let moved_hours = (new_start_hour - original_hour).abs();
        if moved_hours < MIN_RESCHEDULE_MINUTES / 60.0 - 1e-9 {
            log::debug!(
                "Drag of event {} moved {:.1} min, below threshold",
                event.id,
                moved_hours * 60.0
            );
            return DragOutcome::Discarded;
        }

        let new_end_hour = (new_start_hour + duration_hours).min(HOURS_PER_DAY);
        let new_start = event.day.and_time(time_from_hour(new_start_hour));
        let new_end = event.day.and_time(time_from_hour(new_end_hour));

        DragOutcome::Committed(Reschedule {
            event,
            new_start,
            new_end,
        })
    }

    /// Abandon the gesture without an outcome.
    pub fn cancel(self) {
        log::debug!("Drag of event {} cancelled", self.event.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventPeriod;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        day().and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn standup() -> TimedEvent {
        TimedEvent::timed("a", "Standup", at(9, 0), at(10, 0))
    }

    fn start(event: &TimedEvent, listeners: &SurfaceListeners) -> DragRescheduleSession {
        DragRescheduleSession::start(event, 150.0, TimeAxis::default(), 15, listeners).unwrap()
    }

    #[test]
    fn test_start_captures_geometry() {
        let listeners = SurfaceListeners::new();
        let session = start(&standup(), &listeners);

        assert_eq!(session.original_top(), 144.0);
        assert_eq!(session.current_top(), 144.0);
        assert_eq!(session.duration_hours(), 1.0);
        assert_eq!(session.height(), 48.0);
        assert_eq!(listeners.attached_count(), 1);
    }

    #[test]
    fn test_all_day_events_do_not_drag() {
        let listeners = SurfaceListeners::new();
        let holiday = TimedEvent::all_day("h", "Holiday", day());
        let session = DragRescheduleSession::start(&holiday, 10.0, TimeAxis::default(), 15, &listeners);
        assert!(session.is_none());
        assert_eq!(listeners.attached_count(), 0);
    }

    #[test]
    fn test_move_snaps_to_quarter_hour() {
        let listeners = SurfaceListeners::new();
        let mut session = start(&standup(), &listeners);

        assert_eq!(session.pointer_moved(150.0 + 17.0), 156.0);
        assert_eq!(session.pointer_moved(150.0 + 5.0), 144.0);
        assert_eq!(session.pointer_moved(150.0 + 96.0), 240.0);
        assert_eq!(session.preview_start_hour(), 11.0);
    }

    #[test]
    fn test_move_clamps_to_canvas() {
        let listeners = SurfaceListeners::new();
        let mut session = start(&standup(), &listeners);

        assert_eq!(session.pointer_moved(-1000.0), 0.0);
        assert_eq!(session.pointer_moved(5000.0), 864.0 - 48.0);
    }

    #[test]
    fn test_small_move_is_discarded() {
        let listeners = SurfaceListeners::new();
        let mut session = start(&standup(), &listeners);
        session.pointer_moved(150.0 + 5.0);

        assert_eq!(session.finish(), DragOutcome::Discarded);
        assert_eq!(listeners.attached_count(), 0);
    }

    #[test]
    fn test_quarter_hour_move_commits() {
        let listeners = SurfaceListeners::new();
        let mut session = start(&standup(), &listeners);
        session.pointer_moved(150.0 + 12.0);

        match session.finish() {
            DragOutcome::Committed(reschedule) => {
                assert_eq!(reschedule.new_start, at(9, 15));
                assert_eq!(reschedule.new_end, at(10, 15));
            }
            DragOutcome::Discarded => panic!("expected a committed move"),
        }
    }

    #[test]
    fn test_move_just_under_quarter_hour_is_discarded() {
        let listeners = SurfaceListeners::new();
        let start_time = day().and_time(NaiveTime::from_hms_opt(9, 0, 30).unwrap());
        let end_time = day().and_time(NaiveTime::from_hms_opt(10, 0, 30).unwrap());
        let offset = TimedEvent::timed("o", "Standup", start_time, end_time);
        let mut session = start(&offset, &listeners);

        // One grid step snaps the box to 09:15, only 14.5 minutes later.
        assert_eq!(session.pointer_moved(150.0 + 12.0), 156.0);
        assert_eq!(session.finish(), DragOutcome::Discarded);
        assert_eq!(listeners.attached_count(), 0);
    }

    #[test]
    fn test_end_at_midnight_persists_as_last_minute() {
        let listeners = SurfaceListeners::new();
        let late = TimedEvent::timed("late", "Review", at(21, 0), at(23, 0));
        let mut session = DragRescheduleSession::start(&late, 0.0, TimeAxis::default(), 15, &listeners).unwrap();
        session.pointer_moved(48.0);

        match session.finish() {
            DragOutcome::Committed(reschedule) => {
                assert_eq!(reschedule.new_start, at(22, 0));
                assert_eq!(reschedule.new_end, at(23, 59));
            }
            DragOutcome::Discarded => panic!("expected a committed move"),
        }
    }

    #[test]
    fn test_period_event_drags_with_fallback_span() {
        let listeners = SurfaceListeners::new();
        let visit = TimedEvent::in_period("p", "Visit", day(), EventPeriod::Morning);
        let mut session = DragRescheduleSession::start(&visit, 0.0, TimeAxis::default(), 15, &listeners).unwrap();
        assert_eq!(session.duration_hours(), 3.0);

        session.pointer_moved(48.0);
        match session.finish() {
            DragOutcome::Committed(reschedule) => {
                assert_eq!(reschedule.new_start, at(10, 0));
                assert_eq!(reschedule.new_end, at(13, 0));
            }
            DragOutcome::Discarded => panic!("expected a committed move"),
        }
    }

    #[test]
    fn test_cancel_detaches() {
        let listeners = SurfaceListeners::new();
        let session = start(&standup(), &listeners);
        session.cancel();
        assert_eq!(listeners.attached_count(), 0);
    }
}
