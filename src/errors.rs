//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

/// Why a check-in token could not be resolved.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    #[error("Invalid or unknown attendance link")]
    NotFound,

    #[error("This attendance link has expired")]
    Expired,

    #[error("Event location not confirmed yet. Please try again later.")]
    LocationNotConfirmed,
}

/// Coarse classification used by callers to decide what to tell the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, rejected before any state change.
    Validation,
    /// Structurally impossible right now; the organizer must act.
    Precondition,
    /// The token is dead; a fresh link is needed.
    LinkTerminal,
    /// Retry after improving client conditions (or after a storage timeout).
    Retryable,
    /// The identity already has a record for this event.
    Conflict,
    Storage,
    Config,
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Storage did not answer in time; the outcome is unknown and the request is safe to retry")]
    StorageTimeout,

    #[error("Corrupt stored value: {0}")]
    CorruptRow(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Validation errors
    // ---------------------------
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid accuracy: {0}")]
    InvalidAccuracy(String),

    #[error("Invalid radius {0}m: must be between 10 and 1000 meters")]
    InvalidRadius(i64),

    #[error("Invalid link lifetime: {0}")]
    InvalidTtl(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    // ---------------------------
    // Lifecycle errors
    // ---------------------------
    #[error("Event {0} not found")]
    EventNotFound(i64),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("{0}")]
    Link(#[from] LinkError),

    // ---------------------------
    // Check-in errors
    // ---------------------------
    #[error("You have already checked in to this event")]
    AlreadyCheckedIn,

    #[error(
        "GPS accuracy too low ({0}m). Please try moving to an area with better GPS signal."
    )]
    AccuracyTooLow(f64),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidCoordinate(_)
            | AppError::InvalidAccuracy(_)
            | AppError::InvalidRadius(_)
            | AppError::InvalidTtl(_)
            | AppError::InvalidEvent(_)
            | AppError::InvalidTimestamp(_)
            | AppError::InvalidIdentity(_)
            | AppError::EventNotFound(_) => ErrorKind::Validation,
            AppError::PreconditionFailed(_) | AppError::Link(LinkError::LocationNotConfirmed) => {
                ErrorKind::Precondition
            }
            AppError::Link(_) => ErrorKind::LinkTerminal,
            AppError::AccuracyTooLow(_) | AppError::StorageTimeout => ErrorKind::Retryable,
            AppError::AlreadyCheckedIn => ErrorKind::Conflict,
            AppError::Config(_) | AppError::ConfigLoad | AppError::ConfigSave => ErrorKind::Config,
            AppError::Io(_)
            | AppError::Db(_)
            | AppError::Migration(_)
            | AppError::CorruptRow(_)
            | AppError::Json(_) => {
                ErrorKind::Storage
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Retryable
    }

    /// Map a raw SQLite error, turning lock contention past the busy timeout
    /// into `StorageTimeout`.
    pub fn from_sqlite(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;

        match err.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
                AppError::StorageTimeout
            }
            _ => AppError::Db(err),
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::from_sqlite(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_and_timeout_are_retryable() {
        assert!(AppError::AccuracyTooLow(140.0).is_retryable());
        assert!(AppError::StorageTimeout.is_retryable());
        assert!(!AppError::AlreadyCheckedIn.is_retryable());
        assert!(!AppError::Link(LinkError::Expired).is_retryable());
    }

    #[test]
    fn link_errors_split_between_terminal_and_precondition() {
        assert_eq!(
            AppError::Link(LinkError::NotFound).kind(),
            ErrorKind::LinkTerminal
        );
        assert_eq!(
            AppError::Link(LinkError::Expired).kind(),
            ErrorKind::LinkTerminal
        );
        assert_eq!(
            AppError::Link(LinkError::LocationNotConfirmed).kind(),
            ErrorKind::Precondition
        );
    }

    #[test]
    fn accuracy_message_keeps_the_fraction() {
        assert!(
            AppError::AccuracyTooLow(100.4)
                .to_string()
                .starts_with("GPS accuracy too low (100.4m)")
        );
        assert!(
            AppError::AccuracyTooLow(150.0)
                .to_string()
                .starts_with("GPS accuracy too low (150m)")
        );
    }

    #[test]
    fn busy_sqlite_maps_to_timeout() {
        let busy = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        assert!(matches!(AppError::from_sqlite(busy), AppError::StorageTimeout));
    }
}
