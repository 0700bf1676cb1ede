//! SQLite connection wrapper.
//!
//! Every caller (CLI process, worker thread) opens its own connection to the
//! same file; SQLite's locking plus the busy timeout serialise writers.

use crate::errors::AppResult;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_millis(5000);

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    /// Open a connection with WAL journaling, foreign keys on and the given
    /// busy timeout bounding every storage round-trip.
    pub fn open(path: &str, timeout: Duration) -> AppResult<Self> {
        let conn = Connection::open(Path::new(path))?;
        conn.busy_timeout(timeout)?;
        let _mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Helper to execute a closure with a mutable connection reference.
    pub fn with_conn<F, T>(&mut self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        func(&mut self.conn)
    }
}
