// Create/edit payloads for timed events

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::{EventPeriod, TimedEvent};
use crate::utils::date::{last_minute_of_day, time_from_hour};

/// Fields for a new event; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub day: NaiveDate,
    pub title: String,
    pub notes: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub period: Option<EventPeriod>,
    pub all_day: bool,
    pub category: Option<String>,
}

impl NewEvent {
    /// Validate the fields before they reach the store.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if let (Some(start), Some(end)) = (self.start, self.end) {
            if end <= start {
                return Err("Event end time must be after start time".to_string());
            }
        }

        Ok(())
    }

    /// Materialize the event once the store has assigned an id.
    pub fn into_event(self, id: impl Into<String>) -> TimedEvent {
        TimedEvent {
            id: id.into(),
            day: self.day,
            title: self.title,
            notes: self.notes,
            start: self.start,
            end: self.end,
            period: self.period,
            all_day: self.all_day,
            category: self.category,
            external_sync_id: None,
        }
    }
}

/// Partial update; `None` leaves a field untouched.
///
/// Nested options distinguish "keep" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub notes: Option<Option<String>>,
    pub start: Option<Option<NaiveDateTime>>,
    pub end: Option<Option<NaiveDateTime>>,
    pub all_day: Option<bool>,
    pub category: Option<Option<String>>,
    pub external_sync_id: Option<Option<String>>,
}

impl EventPatch {
    /// Patch that only moves an event to a new start/end.
    pub fn reschedule(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start: Some(Some(start)),
            end: Some(Some(end)),
            ..Self::default()
        }
    }

    /// Patch that records the external calendar id returned by a sync.
    pub fn link_external(external_id: impl Into<String>) -> Self {
        Self {
            external_sync_id: Some(Some(external_id.into())),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the patch to an event in place.
    pub fn apply_to(&self, event: &mut TimedEvent) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(notes) = &self.notes {
            event.notes = notes.clone();
        }
        if let Some(start) = self.start {
            event.start = start;
        }
        if let Some(end) = self.end {
            event.end = end;
        }
        if let Some(all_day) = self.all_day {
            event.all_day = all_day;
        }
        if let Some(category) = &self.category {
            event.category = category.clone();
        }
        if let Some(external_id) = &self.external_sync_id {
            event.external_sync_id = external_id.clone();
        }
        // Explicit instants supersede the legacy period slot.
        if event.start.is_some() {
            event.period = None;
        }
    }
}

/// Form state behind the create/edit dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub day: NaiveDate,
    pub title: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub all_day: bool,
    pub category: Option<String>,
    pub notes: String,
}

impl EventDraft {
    /// Empty draft with the toolbar default slot of 09:00-10:00.
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day,
            title: String::new(),
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN),
            all_day: false,
            category: None,
            notes: String::new(),
        }
    }

    /// Draft pre-filled from a timeline tap at `hour`.
    ///
    /// The end defaults to one hour later with the hour capped at 23; when that
    /// cap would not leave a positive span the end becomes 23:59.
    pub fn at_hour(day: NaiveDate, hour: f64) -> Self {
        let start = time_from_hour(hour);
        let end_hour = (start.hour() + 1).min(23);
        let mut end = NaiveTime::from_hms_opt(end_hour, start.minute(), 0).unwrap_or(start);
        if end <= start {
            end = last_minute_of_day();
        }

        Self {
            start,
            end,
            ..Self::new(day)
        }
    }

    /// Draft for editing an existing event; period events use their fallback hours.
    pub fn from_event(event: &TimedEvent) -> Self {
        let start = time_from_hour(event.effective_start_hour());
        let end = time_from_hour(event.effective_end_hour());

        Self {
            day: event.day,
            title: event.title.clone(),
            start,
            end,
            all_day: event.all_day,
            category: event.category.clone(),
            notes: event.notes.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if !self.all_day && self.end <= self.start {
            return Err("Event end time must be after start time".to_string());
        }

        Ok(())
    }

    pub fn start_instant(&self) -> Option<NaiveDateTime> {
        (!self.all_day).then(|| self.day.and_time(self.start))
    }

    pub fn end_instant(&self) -> Option<NaiveDateTime> {
        (!self.all_day).then(|| self.day.and_time(self.end))
    }

    fn trimmed_notes(&self) -> Option<String> {
        let notes = self.notes.trim();
        (!notes.is_empty()).then(|| notes.to_string())
    }

    fn trimmed_category(&self) -> Option<String> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .map(str::to_string)
    }

    /// Validated store payload for a create.
    pub fn to_new_event(&self) -> Result<NewEvent, String> {
        self.validate()?;

        Ok(NewEvent {
            day: self.day,
            title: self.title.trim().to_string(),
            notes: self.trimmed_notes(),
            start: self.start_instant(),
            end: self.end_instant(),
            period: None,
            all_day: self.all_day,
            category: self.trimmed_category(),
        })
    }

    /// Validated store payload for an edit.
    pub fn to_patch(&self) -> Result<EventPatch, String> {
        self.validate()?;

        Ok(EventPatch {
            title: Some(self.title.trim().to_string()),
            notes: Some(self.trimmed_notes()),
            start: Some(self.start_instant()),
            end: Some(self.end_instant()),
            all_day: Some(self.all_day),
            category: Some(self.trimmed_category()),
            external_sync_id: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_default_draft_slot() {
        let draft = EventDraft::new(day());
        assert_eq!(draft.start, t(9, 0));
        assert_eq!(draft.end, t(10, 0));
    }

    #[test]
    fn test_draft_at_hour_defaults_one_hour() {
        let draft = EventDraft::at_hour(day(), 14.0);
        assert_eq!(draft.start, t(14, 0));
        assert_eq!(draft.end, t(15, 0));

        let draft = EventDraft::at_hour(day(), 9.5);
        assert_eq!(draft.start, t(9, 30));
        assert_eq!(draft.end, t(10, 30));
    }

    #[test]
    fn test_draft_at_hour_caps_end_hour() {
        let draft = EventDraft::at_hour(day(), 22.5);
        assert_eq!(draft.end, t(23, 30));

        let draft = EventDraft::at_hour(day(), 23.0);
        assert_eq!(draft.start, t(23, 0));
        assert_eq!(draft.end, t(23, 59));
    }

    #[test]
    fn test_draft_requires_title() {
        let draft = EventDraft::new(day());
        assert_eq!(
            draft.to_new_event().unwrap_err(),
            "Event title cannot be empty"
        );
    }

    #[test]
    fn test_draft_rejects_inverted_times() {
        let mut draft = EventDraft::new(day());
        draft.title = "Review".into();
        draft.end = t(8, 0);
        assert!(draft.validate().is_err());

        draft.all_day = true;
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_to_new_event_trims_fields() {
        let mut draft = EventDraft::at_hour(day(), 10.0);
        draft.title = "  Hearing  ".into();
        draft.notes = "   ".into();
        draft.category = Some(" legal ".into());

        let fields = draft.to_new_event().unwrap();
        assert_eq!(fields.title, "Hearing");
        assert_eq!(fields.notes, None);
        assert_eq!(fields.category, Some("legal".to_string()));
        assert_eq!(fields.start, Some(day().and_time(t(10, 0))));
        assert_eq!(fields.end, Some(day().and_time(t(11, 0))));
    }

    #[test]
    fn test_all_day_draft_has_no_instants() {
        let mut draft = EventDraft::new(day());
        draft.title = "Holiday".into();
        draft.all_day = true;

        let fields = draft.to_new_event().unwrap();
        assert!(fields.all_day);
        assert_eq!(fields.start, None);
        assert_eq!(fields.end, None);
    }

    #[test]
    fn test_draft_from_period_event() {
        let event = TimedEvent::in_period("p", "Visit", day(), EventPeriod::Afternoon);
        let draft = EventDraft::from_event(&event);
        assert_eq!(draft.start, t(14, 0));
        assert_eq!(draft.end, t(18, 0));
    }

    #[test]
    fn test_patch_apply_clears_period() {
        let mut event = TimedEvent::in_period("p", "Visit", day(), EventPeriod::Morning);
        let patch = EventPatch::reschedule(day().and_time(t(11, 0)), day().and_time(t(12, 0)));
        patch.apply_to(&mut event);

        assert_eq!(event.period, None);
        assert_eq!(event.hour_span(), Some((11.0, 12.0)));
        assert_eq!(event.title, "Visit");
    }

    #[test]
    fn test_link_external_only_touches_sync_id() {
        let mut event = TimedEvent::timed("a", "Standup", day().and_time(t(9, 0)), day().and_time(t(10, 0)));
        EventPatch::link_external("g-42").apply_to(&mut event);

        assert_eq!(event.external_sync_id.as_deref(), Some("g-42"));
        assert_eq!(event.hour_span(), Some((9.0, 10.0)));
    }

    #[test]
    fn test_empty_patch() {
        assert!(EventPatch::default().is_empty());
        assert!(!EventPatch::reschedule(day().and_time(t(1, 0)), day().and_time(t(2, 0))).is_empty());
    }
}
