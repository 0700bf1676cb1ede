//! The check-in verifier.
//!
//! Decision order (each step short-circuits):
//! 1. the token (or event link) resolves and is live
//! 2. the event has a confirmed location
//! 3. a known identity has no record for this event yet
//! 4. the fix is accurate enough (`<= 100m`)
//! 5. distance to the confirmed point, rounded to 2 decimals
//! 6. inside the radius (inclusive) → present, otherwise absent
//! 7. one record is written
//!
//! Steps 1-7 run inside a single `BEGIN IMMEDIATE` transaction, and the
//! partial unique index on `(event_id, user_id)` backs up step 3, so
//! concurrent duplicates produce exactly one record.

use crate::core::geodesy::distance_meters;
use crate::core::link::{ensure_link_usable, resolve_on};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{NewAttendance, has_record_for_user, insert_attendance, load_event};
use crate::errors::{AppError, AppResult, LinkError};
use crate::models::attempt::{CheckinAttempt, CheckinTarget};
use crate::models::attendance::{AttendanceRecord, AttendanceStatus, outside_radius_reason};
use crate::models::coordinate::round_distance;
use crate::models::event::ConfirmedLocation;
use chrono::{DateTime, Utc};
use rusqlite::TransactionBehavior;
use tracing::{debug, info};

/// Fixes less precise than this are bounced back to the client. Not per-event.
pub const MAX_ACCURACY_M: f64 = 100.0;

/// Geofence verdict for an attempt that passed the accuracy gate.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub distance_m: f64,
    pub status: AttendanceStatus,
    pub rejection_reason: Option<String>,
}

/// Steps 4-6: pure, no storage.
pub fn judge(
    confirmed: &ConfirmedLocation,
    radius_m: i64,
    attempt: &CheckinAttempt,
) -> AppResult<Verdict> {
    if attempt.accuracy_m > MAX_ACCURACY_M {
        return Err(AppError::AccuracyTooLow(attempt.accuracy_m));
    }

    // the stored value and the verdict must agree, so compare the rounded distance
    let distance_m = round_distance(distance_meters(&confirmed.coordinate, &attempt.coordinate));

    if distance_m <= radius_m as f64 {
        Ok(Verdict {
            distance_m,
            status: AttendanceStatus::Present,
            rejection_reason: None,
        })
    } else {
        Ok(Verdict {
            distance_m,
            status: AttendanceStatus::Absent,
            rejection_reason: Some(outside_radius_reason(distance_m)),
        })
    }
}

pub struct CheckinLogic;

impl CheckinLogic {
    /// Verify one attempt and record the outcome.
    ///
    /// `Ok` carries the written record, `present` or `absent`. Link,
    /// location, duplicate and accuracy failures are `Err` and write nothing.
    pub fn submit(
        pool: &mut DbPool,
        now: DateTime<Utc>,
        target: &CheckinTarget,
        attempt: &CheckinAttempt,
    ) -> AppResult<AttendanceRecord> {
        if let Some(identity) = &attempt.identity {
            identity.validate()?;
        }

        let tx = pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // 1. link validity
        let event = match target {
            CheckinTarget::Token(token) => resolve_on(&tx, now, token)?,
            CheckinTarget::Event(id) => {
                let event = load_event(&tx, *id)?.ok_or(AppError::EventNotFound(*id))?;
                ensure_link_usable(&event, now)?;
                event
            }
        };

        // 2. defensive re-check
        let confirmed = event
            .location
            .as_ref()
            .ok_or(LinkError::LocationNotConfirmed)?;

        // 3. duplicate identity
        if let Some(identity) = &attempt.identity
            && has_record_for_user(&tx, event.id, &identity.user_id)?
        {
            debug!(event_id = event.id, user_id = %identity.user_id, "duplicate check-in rejected");
            return Err(AppError::AlreadyCheckedIn);
        }

        // 4-6.
        let verdict = judge(confirmed, event.radius_m, attempt)?;

        // 7.
        let identity = attempt.identity.as_ref();
        let record = insert_attendance(
            &tx,
            &NewAttendance {
                event_id: event.id,
                user_id: identity.map(|i| i.user_id.as_str()),
                student_number: identity.and_then(|i| i.student_number.as_deref()),
                coordinate: attempt.coordinate,
                accuracy_m: attempt.accuracy_m,
                distance_m: verdict.distance_m,
                device_info: attempt.device_info.as_deref(),
                status: verdict.status,
                rejection_reason: verdict.rejection_reason,
                checkin_time: now,
            },
        )?;

        ttlog(
            &tx,
            now,
            "checkin",
            &event.id.to_string(),
            &format!(
                "{} {} at {}m",
                identity.map_or("anonymous", |i| i.user_id.as_str()),
                record.status.to_db_str(),
                record.distance_str()
            ),
        )?;

        tx.commit()?;

        info!(
            event_id = event.id,
            record_id = record.id,
            status = record.status.to_db_str(),
            distance_m = record.distance_m,
            "check-in recorded"
        );
        Ok(record)
    }
}
