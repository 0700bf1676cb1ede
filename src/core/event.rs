use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{insert_event, load_event};
use crate::errors::{AppError, AppResult};
use crate::models::event::{Event, NewEvent};
use chrono::{DateTime, Utc};
use tracing::info;

/// Minimal event bookkeeping: just enough rows for the attendance lifecycle.
pub struct EventLogic;

impl EventLogic {
    pub fn create(pool: &mut DbPool, now: DateTime<Utc>, new: &NewEvent) -> AppResult<Event> {
        new.validate()?;

        let tx = pool.conn.transaction()?;
        let id = insert_event(&tx, new, now)?;
        ttlog(
            &tx,
            now,
            "create_event",
            &id.to_string(),
            &format!("Created '{}' (radius {}m)", new.title.trim(), new.radius_m),
        )?;
        let event = load_event(&tx, id)?.ok_or(AppError::EventNotFound(id))?;
        tx.commit()?;

        info!(event_id = id, radius_m = new.radius_m, "event created");
        Ok(event)
    }

    pub fn get(pool: &DbPool, event_id: i64) -> AppResult<Event> {
        load_event(&pool.conn, event_id)?.ok_or(AppError::EventNotFound(event_id))
    }
}
