use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::shared::{format_date, format_datetime, parse_date, parse_datetime, parse_period};
use super::EventStore;
use crate::models::event::{EventPatch, NewEvent, TimedEvent};
use crate::services::database::Database;

const EVENT_COLUMNS: &str = "id, title, date, start_time, end_time, period, all_day, \
                             category, notes, google_event_id";

/// Events created through this store are tagged with this source.
const LOCAL_SOURCE: &str = "local";

/// SQLite-backed [`EventStore`].
pub struct SqliteEventStore {
    db: Mutex<Database>,
}

impl SqliteEventStore {
    /// Open (or create) the store at `path` and make sure the schema exists.
    pub fn open(path: &str) -> Result<Self> {
        let db = Database::new(path)?;
        db.initialize_schema()?;
        log::info!("Opened event store at {}", path);
        Ok(Self { db: Mutex::new(db) })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|_| anyhow!("Event store connection lock poisoned"))
    }

    fn row_to_event(row: &Row) -> rusqlite::Result<TimedEvent> {
        let all_day: i32 = row.get(6)?;
        Ok(TimedEvent {
            id: row.get(0)?,
            title: row.get(1)?,
            day: parse_date(2, row.get(2)?)?,
            start: parse_datetime(3, row.get(3)?)?,
            end: parse_datetime(4, row.get(4)?)?,
            period: parse_period(row.get(5)?),
            all_day: all_day != 0,
            category: row.get(7)?,
            notes: row.get(8)?,
            external_sync_id: row.get(9)?,
        })
    }

    /// Load one event by id.
    pub fn get(&self, id: &str) -> Result<Option<TimedEvent>> {
        let db = self.lock()?;
        Self::load(db.connection(), id)
    }

    fn load(conn: &Connection, id: &str) -> Result<Option<TimedEvent>> {
        conn.query_row(
            &format!("SELECT {} FROM calendar_events WHERE id = ?1", EVENT_COLUMNS),
            [id],
            Self::row_to_event,
        )
        .optional()
        .context(format!("Failed to load event {}", id))
    }

    fn list_for_day(&self, day: NaiveDate) -> Result<Vec<TimedEvent>> {
        let db = self.lock()?;
        let mut stmt = db
            .connection()
            .prepare(&format!(
                "SELECT {} FROM calendar_events WHERE date = ?1 ORDER BY start_time ASC, id ASC",
                EVENT_COLUMNS
            ))
            .context("Failed to prepare day event query")?;

        let rows = stmt.query_map([format_date(day)], Self::row_to_event)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context(format!("Failed to load events for {}", day))
    }

    fn insert(&self, fields: NewEvent) -> Result<TimedEvent> {
        fields.validate().map_err(|e| anyhow!(e))?;

        let event = fields.into_event(Uuid::new_v4().to_string());
        let now = Local::now().to_rfc3339();
        let db = self.lock()?;
        db.connection()
            .execute(
                "INSERT INTO calendar_events (
                    id, title, date, start_time, end_time, period, all_day,
                    category, notes, google_event_id, source, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    event.id,
                    event.title,
                    format_date(event.day),
                    format_datetime(event.start),
                    format_datetime(event.end),
                    event.period.map(|period| period.as_str()),
                    event.all_day as i32,
                    event.category,
                    event.notes,
                    event.external_sync_id,
                    LOCAL_SOURCE,
                    &now,
                    &now,
                ],
            )
            .context("Failed to insert event")?;

        log::info!("Created event {} on {}", event.id, event.day);
        Ok(event)
    }

    /// Read, patch and write back under one lock and one transaction, so a
    /// concurrent patch of another field cannot be overwritten with stale values.
    fn apply_patch(&self, id: &str, patch: EventPatch) -> Result<()> {
        let db = self.lock()?;
        let tx = db
            .connection()
            .unchecked_transaction()
            .context("Failed to begin event update")?;

        let mut event = Self::load(&tx, id)?.ok_or_else(|| anyhow!("Event {} not found", id))?;
        patch.apply_to(&mut event);

        if let (Some(start), Some(end)) = (event.start, event.end) {
            if end <= start {
                return Err(anyhow!("Event end time must be after start time"));
            }
        }

        tx.execute(
            "UPDATE calendar_events
             SET title = ?1, start_time = ?2, end_time = ?3, period = ?4, all_day = ?5,
                 category = ?6, notes = ?7, google_event_id = ?8, updated_at = ?9
             WHERE id = ?10",
            params![
                event.title,
                format_datetime(event.start),
                format_datetime(event.end),
                event.period.map(|period| period.as_str()),
                event.all_day as i32,
                event.category,
                event.notes,
                event.external_sync_id,
                Local::now().to_rfc3339(),
                id,
            ],
        )
        .context(format!("Failed to update event {}", id))?;

        tx.commit()
            .context(format!("Failed to commit update of event {}", id))
    }

    fn remove(&self, id: &str) -> Result<()> {
        let db = self.lock()?;
        let rows = db
            .connection()
            .execute("DELETE FROM calendar_events WHERE id = ?1", [id])
            .context(format!("Failed to delete event {}", id))?;

        if rows == 0 {
            return Err(anyhow!("Event {} not found", id));
        }

        log::info!("Deleted event {}", id);
        Ok(())
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn list_events(&self, day: NaiveDate) -> Result<Vec<TimedEvent>> {
        self.list_for_day(day)
    }

    async fn create_event(&self, fields: NewEvent) -> Result<TimedEvent> {
        self.insert(fields)
    }

    async fn update_event(&self, id: &str, patch: EventPatch) -> Result<()> {
        self.apply_patch(id, patch)
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        self.remove(id)
    }
}
