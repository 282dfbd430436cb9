//! Event store entry point.
//! Defines the store boundary the timeline talks to and the SQLite-backed
//! implementation behind it.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::event::{EventPatch, NewEvent, TimedEvent};

mod shared;
pub mod sqlite;

pub use sqlite::SqliteEventStore;

/// Persistent CRUD for the events of a day.
///
/// Writes are last-write-wins; callers re-fetch the day after every mutation
/// instead of patching their own copies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Every event whose date is `day`, ordered by start time.
    async fn list_events(&self, day: NaiveDate) -> Result<Vec<TimedEvent>>;

    /// Insert a new event and return it with its assigned id.
    async fn create_event(&self, fields: NewEvent) -> Result<TimedEvent>;

    async fn update_event(&self, id: &str, patch: EventPatch) -> Result<()>;

    async fn delete_event(&self, id: &str) -> Result<()>;
}
