// Database service module
// SQLite connection and calendar_events schema

use anyhow::{Context, Result};
use rusqlite::Connection;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database connection
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file (or ":memory:" for in-memory)
    ///
    /// # Examples
    /// ```
    /// use day_timeline::services::database::Database;
    /// let db = Database::new(":memory:").unwrap();
    /// ```
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .context(format!("Failed to open database at {}", path))?;

        Ok(Self { conn })
    }

    /// Create the events table and its day index if they don't exist
    pub fn initialize_schema(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS calendar_events (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    date TEXT NOT NULL,
                    start_time TEXT,
                    end_time TEXT,
                    period TEXT,
                    all_day INTEGER NOT NULL DEFAULT 0,
                    category TEXT,
                    notes TEXT,
                    google_event_id TEXT,
                    source TEXT NOT NULL DEFAULT 'local',
                    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )
            .context("Failed to create calendar_events table")?;

        self.conn
            .execute(
                "CREATE INDEX IF NOT EXISTS idx_calendar_events_date ON calendar_events(date)",
                [],
            )
            .context("Failed to create calendar_events date index")?;

        Ok(())
    }

    /// Get a reference to the database connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
