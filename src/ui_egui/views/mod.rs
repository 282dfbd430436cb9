pub mod day_timeline_view;
pub mod palette;

pub use day_timeline_view::{DayTimelineView, TimelineAction};
