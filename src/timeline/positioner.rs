//! Absolute boxes for the day's events and the current-time indicator.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use super::overlap_layout::{ColumnSlot, EventSpan, OverlapLayout};
use super::time_axis::TimeAxis;
use crate::models::event::TimedEvent;
use crate::services::category::CategoryPalette;

/// Rendered placement of one timed event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventBox {
    pub event_id: String,
    pub title: String,
    pub time_label: String,
    pub color: String,
    pub top: f64,
    pub height: f64,
    pub left_percent: f64,
    pub width_percent: f64,
    pub column: ColumnSlot,
    pub start_hour: f64,
    pub end_hour: f64,
}

impl EventBox {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether a point in canvas coordinates (x as percent of width) falls inside.
    pub fn contains(&self, x_percent: f64, y: f64) -> bool {
        y >= self.top
            && y < self.bottom()
            && x_percent >= self.left_percent
            && x_percent < self.left_percent + self.width_percent
    }
}

/// Entry in the all-day strip above the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AllDayItem {
    pub event_id: String,
    pub title: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NowIndicator {
    pub y: f64,
}

pub struct EventPositioner<'a> {
    axis: &'a TimeAxis,
    palette: &'a CategoryPalette,
    min_height: f64,
}

impl<'a> EventPositioner<'a> {
    pub fn new(axis: &'a TimeAxis, palette: &'a CategoryPalette, min_height: f64) -> Self {
        Self {
            axis,
            palette,
            min_height,
        }
    }

    /// Boxes for every non-all-day event, in input order.
    pub fn position(&self, events: &[TimedEvent]) -> Vec<EventBox> {
        let timed: Vec<&TimedEvent> = events.iter().filter(|event| !event.all_day).collect();
        let spans: Vec<EventSpan<'_>> = timed
            .iter()
            .filter_map(|event| EventSpan::from_event(*event))
            .collect();
        let slots = OverlapLayout::compute(&spans);

        timed
            .iter()
            .zip(spans.iter().zip(slots))
            .map(|(event, (span, column))| {
                let top = self.axis.time_to_y(span.start);
                let height = (self.axis.time_to_y(span.end) - top).max(self.min_height);
                let width_percent = 100.0 / column.column_count as f64;

                EventBox {
                    event_id: event.id.clone(),
                    title: event.display_title().to_string(),
                    time_label: event.time_label(),
                    color: self.palette.color_for(event.category.as_deref()).to_string(),
                    top,
                    height,
                    left_percent: column.column_index as f64 * width_percent,
                    width_percent,
                    column,
                    start_hour: span.start,
                    end_hour: span.end,
                }
            })
            .collect()
    }

    /// Items for the all-day strip.
    pub fn all_day(&self, events: &[TimedEvent]) -> Vec<AllDayItem> {
        events
            .iter()
            .filter(|event| event.all_day)
            .map(|event| AllDayItem {
                event_id: event.id.clone(),
                title: event.display_title().to_string(),
                color: self.palette.color_for(event.category.as_deref()).to_string(),
            })
            .collect()
    }

    /// Current-time line, shown only for today while inside the visible window.
    ///
    /// Minute precision is enough; seconds are ignored.
    pub fn now_indicator(&self, day: NaiveDate, now: NaiveDateTime) -> Option<NowIndicator> {
        if now.date() != day {
            return None;
        }

        let hour = now.hour() as f64 + now.minute() as f64 / 60.0;
        self.axis.contains(hour).then(|| NowIndicator {
            y: self.axis.time_to_y(hour),
        })
    }
}
