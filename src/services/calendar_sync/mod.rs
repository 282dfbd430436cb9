//! External calendar synchronization.
//!
//! The timeline never waits on these calls: after a local write succeeds it
//! hands a [`SyncRequest`] to a [`SyncDispatcher`] and moves on. Failures are
//! logged by the dispatcher and never reach the user.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::models::event::TimedEvent;

pub mod dispatcher;
pub mod webhook;

pub use dispatcher::TokioSyncDispatcher;
pub use webhook::WebhookCalendarSync;

/// Event fields mirrored to the external calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPayload {
    pub title: String,
    pub day: NaiveDate,
    pub notes: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl SyncPayload {
    pub fn from_event(event: &TimedEvent) -> Self {
        Self {
            title: event.title.clone(),
            day: event.day,
            notes: event.notes.clone(),
            start: event.start,
            end: event.end,
        }
    }
}

/// Successful sync; carries the external id when the remote side assigned one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncAck {
    pub external_sync_id: Option<String>,
}

#[async_trait]
pub trait CalendarSync: Send + Sync {
    async fn sync_create(&self, event_id: &str, payload: &SyncPayload) -> Result<SyncAck>;

    /// Without a known external id the event is created remotely instead.
    async fn sync_update(
        &self,
        event_id: &str,
        external_sync_id: Option<&str>,
        payload: &SyncPayload,
    ) -> Result<SyncAck>;

    /// Without a known external id there is nothing to remove remotely.
    async fn sync_delete(&self, event_id: &str, external_sync_id: Option<&str>) -> Result<SyncAck>;
}

/// A sync call queued after a successful local mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncRequest {
    Create {
        event_id: String,
        payload: SyncPayload,
    },
    Update {
        event_id: String,
        external_sync_id: Option<String>,
        payload: SyncPayload,
    },
    Delete {
        event_id: String,
        external_sync_id: Option<String>,
    },
}

impl SyncRequest {
    pub fn create(event: &TimedEvent) -> Self {
        SyncRequest::Create {
            event_id: event.id.clone(),
            payload: SyncPayload::from_event(event),
        }
    }

    pub fn update(event: &TimedEvent) -> Self {
        SyncRequest::Update {
            event_id: event.id.clone(),
            external_sync_id: event.external_sync_id.clone(),
            payload: SyncPayload::from_event(event),
        }
    }

    pub fn delete(event_id: impl Into<String>, external_sync_id: Option<String>) -> Self {
        SyncRequest::Delete {
            event_id: event_id.into(),
            external_sync_id,
        }
    }

    pub fn event_id(&self) -> &str {
        match self {
            SyncRequest::Create { event_id, .. }
            | SyncRequest::Update { event_id, .. }
            | SyncRequest::Delete { event_id, .. } => event_id,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            SyncRequest::Create { .. } => "create",
            SyncRequest::Update { .. } => "update",
            SyncRequest::Delete { .. } => "delete",
        }
    }

    /// Whether a returned external id should be recorded on the local event.
    pub fn links_external_id(&self) -> bool {
        match self {
            SyncRequest::Create { .. } => true,
            SyncRequest::Update {
                external_sync_id, ..
            } => external_sync_id.is_none(),
            SyncRequest::Delete { .. } => false,
        }
    }

    pub async fn send(&self, sync: &dyn CalendarSync) -> Result<SyncAck> {
        match self {
            SyncRequest::Create { event_id, payload } => sync.sync_create(event_id, payload).await,
            SyncRequest::Update {
                event_id,
                external_sync_id,
                payload,
            } => {
                sync.sync_update(event_id, external_sync_id.as_deref(), payload)
                    .await
            }
            SyncRequest::Delete {
                event_id,
                external_sync_id,
            } => sync.sync_delete(event_id, external_sync_id.as_deref()).await,
        }
    }
}

/// Fire-and-forget hand-off for sync requests.
pub trait SyncDispatcher: Send + Sync {
    fn dispatch(&self, request: SyncRequest);
}

/// Dispatcher used when no external calendar is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSyncDispatcher;

impl SyncDispatcher for NoopSyncDispatcher {
    fn dispatch(&self, request: SyncRequest) {
        log::debug!(
            "Calendar sync not configured; skipping {} for {}",
            request.action(),
            request.event_id()
        );
    }
}
