use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::update_confirmed_location;
use crate::errors::{AppError, AppResult};
use crate::models::coordinate::{Coordinate, accuracy_to_db, validate_accuracy};
use crate::models::event::ConfirmedLocation;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Organizer confirmations beyond this are stored, but flagged in the logs.
const LOOSE_CONFIRMATION_M: i64 = 100;

pub struct ConfirmLogic;

impl ConfirmLogic {
    /// Record (or overwrite) the organizer's reference point for an event.
    ///
    /// Accuracy is stored as-is; only attendees are held to an accuracy gate.
    pub fn apply(
        pool: &mut DbPool,
        now: DateTime<Utc>,
        event_id: i64,
        coordinate: Coordinate,
        accuracy_m: f64,
    ) -> AppResult<ConfirmedLocation> {
        let accuracy_m = validate_accuracy(accuracy_m)?;

        let location = ConfirmedLocation {
            coordinate,
            accuracy_m: accuracy_to_db(accuracy_m),
            confirmed_at: now,
        };

        let tx = pool.conn.transaction()?;
        if !update_confirmed_location(&tx, event_id, &location)? {
            return Err(AppError::EventNotFound(event_id));
        }
        ttlog(
            &tx,
            now,
            "confirm_location",
            &event_id.to_string(),
            &format!(
                "Confirmed at {}, {} (±{}m)",
                coordinate.lat(),
                coordinate.lng(),
                location.accuracy_m
            ),
        )?;
        tx.commit()?;

        if location.accuracy_m > LOOSE_CONFIRMATION_M {
            warn!(
                event_id,
                accuracy_m = location.accuracy_m,
                "location confirmed with poor accuracy"
            );
        }
        info!(event_id, accuracy_m = location.accuracy_m, "location confirmed");

        Ok(location)
    }
}
