// Test fixtures - reusable test data
// Shared days, events and collaborators for the timeline scenarios

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use day_timeline::models::event::{NewEvent, TimedEvent};
use day_timeline::models::settings::TimelineSettings;
use day_timeline::services::calendar_sync::{SyncDispatcher, SyncRequest};
use day_timeline::services::event::{EventStore, SqliteEventStore};
use day_timeline::timeline::DayTimelineController;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday June 2, 2025, the day every scenario is shown on
    pub fn shown_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
        shown_day().and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
    }

    /// Noon on the shown day, used as "now"
    pub fn noon() -> NaiveDateTime {
        at(12, 0)
    }
}

/// Sample events for testing
pub mod events {
    use super::dates::{at, shown_day};
    use super::*;

    pub fn timed(title: &str, start: (u32, u32), end: (u32, u32)) -> NewEvent {
        NewEvent {
            day: shown_day(),
            title: title.to_string(),
            notes: None,
            start: Some(at(start.0, start.1)),
            end: Some(at(end.0, end.1)),
            period: None,
            all_day: false,
            category: None,
        }
    }

    pub fn all_day(title: &str) -> NewEvent {
        NewEvent {
            start: None,
            end: None,
            all_day: true,
            ..timed(title, (0, 0), (0, 0))
        }
    }
}

/// Dispatcher that only records what it was asked to send.
#[derive(Default)]
pub struct RecordingDispatcher {
    requests: Mutex<Vec<SyncRequest>>,
}

impl RecordingDispatcher {
    pub fn requests(&self) -> Vec<SyncRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<&'static str> {
        self.requests().iter().map(SyncRequest::action).collect()
    }
}

impl SyncDispatcher for RecordingDispatcher {
    fn dispatch(&self, request: SyncRequest) {
        self.requests.lock().unwrap().push(request);
    }
}

/// In-memory store, recording dispatcher and a controller wired to both.
pub struct Harness {
    pub store: Arc<SqliteEventStore>,
    pub sync: Arc<RecordingDispatcher>,
    pub controller: DayTimelineController,
}

impl Harness {
    pub async fn new(seed: Vec<NewEvent>) -> Self {
        Self::with_settings(TimelineSettings::default(), seed).await
    }

    pub async fn with_settings(settings: TimelineSettings, seed: Vec<NewEvent>) -> Self {
        let store = Arc::new(SqliteEventStore::in_memory().expect("in-memory store"));
        for fields in seed {
            store.create_event(fields).await.expect("seed event");
        }
        let sync = Arc::new(RecordingDispatcher::default());
        let mut controller =
            DayTimelineController::new(settings, store.clone(), sync.clone(), dates::noon());
        controller.refresh().await.expect("initial load");

        Self {
            store,
            sync,
            controller,
        }
    }

    pub fn event_titled(&self, title: &str) -> TimedEvent {
        self.controller
            .events()
            .iter()
            .find(|event| event.title == title)
            .cloned()
            .unwrap_or_else(|| panic!("no event titled {}", title))
    }

    pub fn stored(&self, id: &str) -> TimedEvent {
        self.store.get(id).expect("store read").expect("event exists")
    }
}
