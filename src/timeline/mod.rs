//! Headless day timeline: geometry, layout, gestures and the controller that
//! ties them to the event store.

pub mod controller;
pub mod drag_session;
pub mod error;
pub mod gesture;
pub mod listeners;
pub mod overlap_layout;
pub mod positioner;
pub mod render_model;
pub mod time_axis;

pub use controller::{DayTimelineController, DialogState, Notice, NoticeLevel};
pub use drag_session::{DragOutcome, DragRescheduleSession, Reschedule};
pub use error::{TimelineError, TimelineResult};
pub use gesture::{EmptyAreaGestureClassifier, GestureState, TapThresholds};
pub use listeners::{ListenerHandle, SurfaceListeners};
pub use overlap_layout::{ColumnSlot, EventSpan, OverlapLayout};
pub use positioner::{AllDayItem, EventBox, EventPositioner, NowIndicator};
pub use render_model::{DragPreview, RenderModel};
pub use time_axis::{HourLabel, TimeAxis};
