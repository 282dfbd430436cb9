//! Everything the view needs to paint one frame of the day timeline.

use chrono::NaiveDate;

use super::positioner::{AllDayItem, EventBox, NowIndicator};
use super::time_axis::HourLabel;

/// Ghost of the box being dragged, at its snapped position.
#[derive(Debug, Clone, PartialEq)]
pub struct DragPreview {
    pub event_id: String,
    pub top: f64,
    pub height: f64,
    /// Times the event would get if released now
    pub time_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderModel {
    pub day: NaiveDate,
    pub day_label: String,
    pub is_today: bool,
    pub boxes: Vec<EventBox>,
    pub all_day: Vec<AllDayItem>,
    pub now_indicator: Option<NowIndicator>,
    pub hour_labels: Vec<HourLabel>,
    pub canvas_height: f64,
    pub drag_preview: Option<DragPreview>,
    pub event_count_label: String,
}

impl RenderModel {
    /// Topmost box under a canvas point, if any. Later boxes paint over earlier ones.
    pub fn box_at(&self, x_percent: f64, y: f64) -> Option<&EventBox> {
        self.boxes
            .iter()
            .rev()
            .find(|event_box| event_box.contains(x_percent, y))
    }
}

pub fn day_label(day: NaiveDate) -> String {
    day.format("%A, %-d %B %Y").to_string()
}

pub fn event_count_label(count: usize) -> String {
    match count {
        0 => "No events".to_string(),
        1 => "1 event".to_string(),
        n => format!("{} events", n),
    }
}
