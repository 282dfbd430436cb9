//! Orchestration of the day timeline.
//!
//! The controller owns the displayed day, the event list, dialog state and the
//! gesture machinery. It never edits its event list in place: every write goes
//! to the store and is followed by a full re-fetch.

use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

use super::drag_session::{DragOutcome, DragRescheduleSession, Reschedule};
use super::error::{TimelineError, TimelineResult};
use super::gesture::{EmptyAreaGestureClassifier, TapThresholds};
use super::listeners::SurfaceListeners;
use super::positioner::EventPositioner;
use super::render_model::{day_label, event_count_label, DragPreview, RenderModel};
use super::time_axis::TimeAxis;
use crate::models::event::{EventDraft, EventPatch, TimedEvent};
use crate::models::settings::TimelineSettings;
use crate::services::calendar_sync::{SyncDispatcher, SyncRequest};
use crate::services::category::CategoryPalette;
use crate::services::event::EventStore;
use crate::utils::date::{format_hm, time_from_hour, HOURS_PER_DAY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Transient user-facing message, drained by the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogState {
    Closed,
    Create(EventDraft),
    Edit { id: String, draft: EventDraft },
    ConfirmDelete { id: String, title: String },
}

impl DialogState {
    pub fn is_open(&self) -> bool {
        !matches!(self, DialogState::Closed)
    }
}

pub struct DayTimelineController {
    settings: TimelineSettings,
    axis: TimeAxis,
    store: Arc<dyn EventStore>,
    sync: Arc<dyn SyncDispatcher>,
    palette: CategoryPalette,
    day: NaiveDate,
    now: NaiveDateTime,
    events: Vec<TimedEvent>,
    dialog: DialogState,
    drag: Option<DragRescheduleSession>,
    classifier: EmptyAreaGestureClassifier,
    listeners: SurfaceListeners,
    notices: Vec<Notice>,
}

impl DayTimelineController {
    /// Controller showing the day of `now`. Call [`refresh`](Self::refresh) to load it.
    pub fn new(
        settings: TimelineSettings,
        store: Arc<dyn EventStore>,
        sync: Arc<dyn SyncDispatcher>,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            axis: TimeAxis::from_settings(&settings),
            classifier: EmptyAreaGestureClassifier::new(TapThresholds::from_settings(&settings)),
            settings,
            store,
            sync,
            palette: CategoryPalette::default(),
            day: now.date(),
            now,
            events: Vec::new(),
            dialog: DialogState::Closed,
            drag: None,
            listeners: SurfaceListeners::new(),
            notices: Vec::new(),
        }
    }

    pub fn with_palette(mut self, palette: CategoryPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn settings(&self) -> &TimelineSettings {
        &self.settings
    }

    pub fn axis(&self) -> &TimeAxis {
        &self.axis
    }

    pub fn palette(&self) -> &CategoryPalette {
        &self.palette
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Live surface listener registrations; at most one while a drag is active.
    pub fn attached_listener_count(&self) -> usize {
        self.listeners.attached_count()
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice::new(level, message));
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // --- Loading and navigation ---

    /// Replace the event list with the store's view of the selected day.
    ///
    /// On failure the previous list stays in place.
    pub async fn refresh(&mut self) -> TimelineResult<()> {
        match self.store.list_events(self.day).await {
            Ok(events) => {
                log::debug!("Loaded {} events for {}", events.len(), self.day);
                self.events = events;
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to load events for {}: {:#}", self.day, err);
                self.notify(NoticeLevel::Error, "Failed to load events");
                Err(TimelineError::Store(err))
            }
        }
    }

    pub async fn set_day(&mut self, day: NaiveDate) -> TimelineResult<()> {
        if let Some(session) = self.drag.take() {
            session.cancel();
        }
        self.classifier.reset();
        self.day = day;
        self.refresh().await
    }

    pub async fn previous(&mut self) -> TimelineResult<()> {
        self.set_day(self.day - Duration::days(1)).await
    }

    pub async fn next(&mut self) -> TimelineResult<()> {
        self.set_day(self.day + Duration::days(1)).await
    }

    pub async fn today(&mut self) -> TimelineResult<()> {
        self.set_day(self.now.date()).await
    }

    /// Advance the clock that drives the now indicator.
    pub fn tick(&mut self, now: NaiveDateTime) {
        self.now = now;
    }

    pub fn tick_local(&mut self) {
        self.tick(Local::now().naive_local());
    }

    // --- Render model ---

    pub fn render_model(&self) -> RenderModel {
        let positioner =
            EventPositioner::new(&self.axis, &self.palette, self.settings.min_event_height);
        let mut boxes = positioner.position(&self.events);
        let drag_preview = self.drag.as_ref().map(|session| {
            let start = session.preview_start_hour();
            let end = session.preview_end_hour();
            DragPreview {
                event_id: session.event_id().to_string(),
                top: session.current_top(),
                height: session.height().max(self.settings.min_event_height),
                time_label: format!(
                    "{} - {}",
                    format_hm(time_from_hour(start)),
                    format_hm(time_from_hour(end))
                ),
            }
        });

        if let Some(preview) = &drag_preview {
            if let Some(dragged) = boxes.iter_mut().find(|b| b.event_id == preview.event_id) {
                dragged.top = preview.top;
            }
        }

        RenderModel {
            day: self.day,
            day_label: day_label(self.day),
            is_today: self.day == self.now.date(),
            boxes,
            all_day: positioner.all_day(&self.events),
            now_indicator: positioner.now_indicator(self.day, self.now),
            hour_labels: self.axis.hour_labels(),
            canvas_height: self.axis.total_height(),
            drag_preview,
            event_count_label: event_count_label(self.events.len()),
        }
    }

    // --- Dialogs ---

    pub fn dialog(&self) -> &DialogState {
        &self.dialog
    }

    pub fn dialog_mut(&mut self) -> &mut DialogState {
        &mut self.dialog
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog.is_open()
    }

    /// Open the create dialog, at 09:00 without a preset hour.
    pub fn open_create(&mut self, hour: Option<f64>) {
        let draft = match hour {
            Some(hour) => EventDraft::at_hour(self.day, hour),
            None => EventDraft::new(self.day),
        };
        self.dialog = DialogState::Create(draft);
    }

    fn find_event(&self, id: &str) -> TimelineResult<&TimedEvent> {
        self.events
            .iter()
            .find(|event| event.id == id)
            .ok_or_else(|| TimelineError::NotFound(id.to_string()))
    }

    pub fn open_edit(&mut self, id: &str) -> TimelineResult<()> {
        let draft = EventDraft::from_event(self.find_event(id)?);
        self.dialog = DialogState::Edit {
            id: id.to_string(),
            draft,
        };
        Ok(())
    }

    pub fn request_delete(&mut self, id: &str) -> TimelineResult<()> {
        let title = self.find_event(id)?.display_title().to_string();
        self.dialog = DialogState::ConfirmDelete {
            id: id.to_string(),
            title,
        };
        Ok(())
    }

    pub fn close_dialog(&mut self) {
        self.dialog = DialogState::Closed;
    }

    /// Validate and persist the open dialog.
    ///
    /// Validation failures keep the dialog open and never reach the store. On a
    /// successful write the matching sync request is dispatched and the dialog
    /// closes. The day is re-fetched after any write attempt.
    pub async fn submit_dialog(&mut self) -> TimelineResult<()> {
        let result = match self.dialog.clone() {
            DialogState::Closed => return Ok(()),
            DialogState::Create(draft) => {
                let fields = self.validated(draft.to_new_event())?;
                self.store.create_event(fields).await.map(|created| {
                    self.sync.dispatch(SyncRequest::create(&created));
                    "Event created"
                })
            }
            DialogState::Edit { id, draft } => {
                let patch = self.validated(draft.to_patch())?;
                let mut updated = self.find_event(&id)?.clone();
                patch.apply_to(&mut updated);
                self.store.update_event(&id, patch).await.map(|()| {
                    self.sync.dispatch(SyncRequest::update(&updated));
                    "Event updated"
                })
            }
            DialogState::ConfirmDelete { id, .. } => {
                let external_id = self.find_event(&id)?.external_sync_id.clone();
                self.store.delete_event(&id).await.map(|()| {
                    self.sync.dispatch(SyncRequest::delete(id.clone(), external_id));
                    "Event deleted"
                })
            }
        };

        let outcome = match result {
            Ok(message) => {
                log::info!("{}", message);
                self.notify(NoticeLevel::Success, message);
                self.dialog = DialogState::Closed;
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to save event: {:#}", err);
                self.notify(NoticeLevel::Error, format!("Failed to save event: {}", err));
                Err(TimelineError::Store(err))
            }
        };

        // A failed refresh is already reported as its own notice.
        let _ = self.refresh().await;
        outcome
    }

    fn validated<T>(&mut self, result: Result<T, String>) -> TimelineResult<T> {
        result.map_err(|message| {
            self.notify(NoticeLevel::Warning, message.clone());
            TimelineError::Validation(message)
        })
    }

    // --- Gestures ---

    /// Primary press on an event box. Returns whether a drag started.
    pub fn pointer_down_on_event(&mut self, id: &str, y: f64, _at: Instant) -> bool {
        if self.is_dialog_open() {
            return false;
        }

        if let Some(stale) = self.drag.take() {
            log::warn!(
                "Tearing down stale drag of event {} before starting a new one",
                stale.event_id()
            );
            stale.cancel();
        }

        let Some(event) = self.events.iter().find(|event| event.id == id) else {
            log::warn!("Press on unknown event {}", id);
            return false;
        };

        let session = DragRescheduleSession::start(
            event,
            y,
            self.axis,
            self.settings.drag_snap_minutes,
            &self.listeners,
        );
        match session {
            Some(session) => {
                self.drag = Some(session);
                self.classifier.drag_started();
                true
            }
            None => false,
        }
    }

    /// Primary press on the empty background. Returns whether a tap is armed.
    pub fn pointer_down_on_background(&mut self, y: f64, at: Instant) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let dialog_open = self.is_dialog_open();
        self.classifier.pointer_down(y, at, dialog_open)
    }

    /// Pointer moved anywhere on the surface. Returns the preview top while dragging.
    pub fn pointer_move(&mut self, y: f64) -> Option<f64> {
        self.drag.as_mut().map(|session| session.pointer_moved(y))
    }

    /// Primary release anywhere on the surface.
    ///
    /// Ends an active drag (committing it when it moved far enough) or, for a
    /// background press, opens the create dialog when the gesture was a tap.
    pub async fn pointer_up(&mut self, y: f64, at: Instant, over_event: bool) -> TimelineResult<()> {
        let dialog_open = self.is_dialog_open();

        if let Some(session) = self.drag.take() {
            let outcome = session.finish();
            self.classifier.drag_finished(at);
            // The guard swallows this release so it cannot double as a tap.
            let _ = self.classifier.pointer_up(y, at, over_event, dialog_open);

            return match outcome {
                DragOutcome::Discarded => Ok(()),
                DragOutcome::Committed(reschedule) => self.commit_reschedule(reschedule).await,
            };
        }

        if let Some(tap_y) = self.classifier.pointer_up(y, at, over_event, dialog_open) {
            let hour = self.tap_hour(tap_y);
            log::debug!("Tap at y={:.1} opens create at {:.2}", tap_y, hour);
            self.open_create(Some(hour));
        }
        Ok(())
    }

    /// Hour a background tap at `y` creates an event at.
    pub fn tap_hour(&self, y: f64) -> f64 {
        let increment = self.settings.tap_snap_minutes;
        let latest = (HOURS_PER_DAY - increment as f64 / 60.0).max(0.0);
        TimeAxis::snap(self.axis.y_to_time(y), increment)
            .max(0.0)
            .min(latest)
    }

    async fn commit_reschedule(&mut self, reschedule: Reschedule) -> TimelineResult<()> {
        let Reschedule {
            event,
            new_start,
            new_end,
        } = reschedule;
        let patch = EventPatch::reschedule(new_start, new_end);
        let mut updated = event.clone();
        patch.apply_to(&mut updated);

        let outcome = match self.store.update_event(&event.id, patch).await {
            Ok(()) => {
                log::info!(
                    "Rescheduled event {} to {} - {}",
                    event.id,
                    new_start,
                    new_end
                );
                self.sync.dispatch(SyncRequest::update(&updated));
                self.notify(
                    NoticeLevel::Success,
                    format!("Event moved to {}", format_hm(new_start.time())),
                );
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to reschedule event {}: {:#}", event.id, err);
                self.notify(NoticeLevel::Error, "Failed to move event");
                Err(TimelineError::Store(err))
            }
        };

        // No local revert: the refreshed list is the source of truth.
        let _ = self.refresh().await;
        outcome
    }

    /// Detach any live drag. Called when the view goes away.
    pub fn teardown(&mut self) {
        if let Some(session) = self.drag.take() {
            log::debug!("Detaching drag of event {} on teardown", session.event_id());
            session.cancel();
        }
        self.classifier.reset();
    }
}

impl Drop for DayTimelineController {
    fn drop(&mut self) {
        self.teardown();
    }
}
