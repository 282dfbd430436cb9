// Event module
// Timed event model as stored for a single displayed day

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::date::{format_hm, hour_of, HOURS_PER_DAY};

mod draft;

pub use draft::{EventDraft, EventPatch, NewEvent};

/// Legacy coarse time slot used when an event has no explicit start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPeriod {
    Morning,
    Afternoon,
}

impl EventPeriod {
    /// Fixed hour range `(start, end)` a period renders as.
    pub fn hour_range(self) -> (u32, u32) {
        match self {
            EventPeriod::Morning => (9, 12),
            EventPeriod::Afternoon => (14, 18),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventPeriod::Morning => "morning",
            EventPeriod::Afternoon => "afternoon",
        }
    }

    /// Display label such as `9:00 - 12:00`.
    pub fn time_label(self) -> String {
        let (start, end) = self.hour_range();
        format!("{}:00 - {}:00", start, end)
    }
}

impl fmt::Display for EventPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventPeriod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(EventPeriod::Morning),
            "afternoon" => Ok(EventPeriod::Afternoon),
            other => Err(format!("Unknown event period: {}", other)),
        }
    }
}

/// An event on the displayed day.
///
/// Timed events carry explicit instants; legacy events only carry a
/// [`EventPeriod`]. All-day events are never placed on the time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub id: String,
    pub day: NaiveDate,
    pub title: String,
    pub notes: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub period: Option<EventPeriod>,
    pub all_day: bool,
    pub category: Option<String>,
    /// Identifier in the external calendar, `None` for events never synced.
    pub external_sync_id: Option<String>,
}

impl TimedEvent {
    /// Create a timed event spanning `start..end` on `start`'s day.
    pub fn timed(
        id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            day: start.date(),
            title: title.into(),
            notes: None,
            start: Some(start),
            end: Some(end),
            period: None,
            all_day: false,
            category: None,
            external_sync_id: None,
        }
    }

    /// Create a legacy period event without explicit instants.
    pub fn in_period(
        id: impl Into<String>,
        title: impl Into<String>,
        day: NaiveDate,
        period: EventPeriod,
    ) -> Self {
        Self {
            id: id.into(),
            day,
            title: title.into(),
            notes: None,
            start: None,
            end: None,
            period: Some(period),
            all_day: false,
            category: None,
            external_sync_id: None,
        }
    }

    /// Create an all-day event.
    pub fn all_day(id: impl Into<String>, title: impl Into<String>, day: NaiveDate) -> Self {
        Self {
            id: id.into(),
            day,
            title: title.into(),
            notes: None,
            start: None,
            end: None,
            period: None,
            all_day: true,
            category: None,
            external_sync_id: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_external_sync_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_sync_id = Some(external_id.into());
        self
    }

    /// The period used when no explicit start exists; unknown periods render as morning.
    pub fn fallback_period(&self) -> EventPeriod {
        self.period.unwrap_or(EventPeriod::Morning)
    }

    /// Effective start as a fractional hour of the day.
    pub fn effective_start_hour(&self) -> f64 {
        match self.start {
            Some(start) => hour_of(start.time()),
            None => self.fallback_period().hour_range().0 as f64,
        }
    }

    /// Effective end as a fractional hour of the day, always after the start.
    ///
    /// A raw end at or before the start, or on a later date, clamps to the end
    /// of the day (24.0). A start without an end spans one hour.
    pub fn effective_end_hour(&self) -> f64 {
        let Some(start) = self.start else {
            return self.fallback_period().hour_range().1 as f64;
        };

        match self.end {
            Some(end) if end > start && end.date() == start.date() => hour_of(end.time()),
            Some(_) => HOURS_PER_DAY,
            None => (hour_of(start.time()) + 1.0).min(HOURS_PER_DAY),
        }
    }

    /// `(start, end)` in hours for events placed on the time axis.
    pub fn hour_span(&self) -> Option<(f64, f64)> {
        if self.all_day {
            None
        } else {
            Some((self.effective_start_hour(), self.effective_end_hour()))
        }
    }

    /// Length of the effective span in hours.
    pub fn duration_hours(&self) -> f64 {
        self.effective_end_hour() - self.effective_start_hour()
    }

    /// Time range label shown inside the event box.
    pub fn time_label(&self) -> String {
        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                format!("{} - {}", format_hm(start.time()), format_hm(end.time()))
            }
            (Some(start), None) => format_hm(start.time()),
            _ => self.fallback_period().time_label(),
        }
    }

    /// Title used for display, with a placeholder for untitled events.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }
}
