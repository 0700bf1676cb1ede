//! Read side of the attendance ledger and insert notifications.
//!
//! The ledger is append-only: there is no update or delete path.

use crate::db::pool::DbPool;
use crate::db::queries::{load_attendance_by_event, load_attendance_by_user, load_event};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use std::sync::mpsc::{Receiver, Sender, channel};
use tracing::warn;

/// Observer notified after a record has been committed.
pub trait AttendanceSink: Send + Sync {
    fn record_added(&self, record: &AttendanceRecord);
}

/// Forwards every new record into an mpsc channel.
pub struct ChannelSink {
    tx: Sender<AttendanceRecord>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<AttendanceRecord>) {
        let (tx, rx) = channel();
        (Self { tx }, rx)
    }
}

impl AttendanceSink for ChannelSink {
    fn record_added(&self, record: &AttendanceRecord) {
        if self.tx.send(record.clone()).is_err() {
            warn!(record_id = record.id, "attendance subscriber went away");
        }
    }
}

pub struct LedgerLogic;

impl LedgerLogic {
    /// Records of one event, newest first.
    pub fn for_event(pool: &DbPool, event_id: i64) -> AppResult<Vec<AttendanceRecord>> {
        if load_event(&pool.conn, event_id)?.is_none() {
            return Err(AppError::EventNotFound(event_id));
        }
        load_attendance_by_event(&pool.conn, event_id)
    }

    /// Records of one attendee across every event, newest first.
    pub fn for_user(pool: &DbPool, user_id: &str) -> AppResult<Vec<AttendanceRecord>> {
        load_attendance_by_user(&pool.conn, user_id)
    }
}
