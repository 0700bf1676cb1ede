use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceRecord, AttendanceStatus};
use crate::models::coordinate::{Coordinate, accuracy_to_db, distance_to_db};
use crate::models::event::{CheckinLink, ConfirmedLocation, Event, NewEvent};
use crate::utils::time::{ts_from_db, ts_to_db};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};

const EVENT_COLUMNS: &str = "id, title, description, lead_id, radius_meters, starts_at, ends_at,
     location_lat, location_lng, location_accuracy_m, location_confirmed_at,
     link_token, link_issued_at, link_expires_at, created_at";

const ATTENDANCE_COLUMNS: &str = "id, event_id, user_id, student_number, lat, lng, accuracy_m,
     distance_m, device_info, status, rejection_reason, checkin_time";

/// Wrap a domain parsing failure so it can travel through rusqlite's row mapper.
fn conversion_failure(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(err))
}

fn opt_ts(row: &Row, col: &str, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match row.get::<_, Option<String>>(col)? {
        Some(s) => ts_from_db(&s)
            .map(Some)
            .map_err(|e| conversion_failure(idx, e)),
        None => Ok(None),
    }
}

pub fn map_event_row(row: &Row) -> rusqlite::Result<Event> {
    let lat: Option<String> = row.get("location_lat")?;
    let lng: Option<String> = row.get("location_lng")?;
    let confirmed_at = opt_ts(row, "location_confirmed_at", 10)?;

    // all three must be present for the confirmation to count
    let location = match (lat, lng, confirmed_at) {
        (Some(lat), Some(lng), Some(confirmed_at)) => Some(ConfirmedLocation {
            coordinate: Coordinate::from_db_strs(&lat, &lng).map_err(|e| conversion_failure(7, e))?,
            accuracy_m: row
                .get::<_, Option<i64>>("location_accuracy_m")?
                .unwrap_or(0),
            confirmed_at,
        }),
        _ => None,
    };

    let token: Option<String> = row.get("link_token")?;
    let issued_at = opt_ts(row, "link_issued_at", 12)?;
    let expires_at = opt_ts(row, "link_expires_at", 13)?;
    let link = match (token, issued_at, expires_at) {
        (Some(token), Some(issued_at), Some(expires_at)) => Some(CheckinLink {
            token,
            issued_at,
            expires_at,
        }),
        _ => None,
    };

    let created_at: String = row.get("created_at")?;

    Ok(Event {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        lead_id: row.get("lead_id")?,
        radius_m: row.get("radius_meters")?,
        starts_at: opt_ts(row, "starts_at", 5)?,
        ends_at: opt_ts(row, "ends_at", 6)?,
        location,
        link,
        created_at: ts_from_db(&created_at).map_err(|e| conversion_failure(14, e))?,
    })
}

pub fn insert_event(conn: &Connection, ev: &NewEvent, created_at: DateTime<Utc>) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO events (title, description, lead_id, radius_meters, starts_at, ends_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            ev.title.trim(),
            ev.description,
            ev.lead_id,
            ev.radius_m,
            ev.starts_at.map(ts_to_db),
            ev.ends_at.map(ts_to_db),
            ts_to_db(created_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_event(conn: &Connection, id: i64) -> AppResult<Option<Event>> {
    let sql = format!("SELECT {} FROM events WHERE id = ?1", EVENT_COLUMNS);
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([id], map_event_row).optional()?)
}

pub fn load_event_by_token(conn: &Connection, token: &str) -> AppResult<Option<Event>> {
    let sql = format!("SELECT {} FROM events WHERE link_token = ?1", EVENT_COLUMNS);
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([token], map_event_row).optional()?)
}

/// Overwrite the confirmed location. Returns false when the event does not exist.
pub fn update_confirmed_location(
    conn: &Connection,
    event_id: i64,
    loc: &ConfirmedLocation,
) -> AppResult<bool> {
    let (lat, lng) = loc.coordinate.to_db_strings();
    let n = conn.execute(
        "UPDATE events
         SET location_lat = ?1, location_lng = ?2,
             location_accuracy_m = ?3, location_confirmed_at = ?4
         WHERE id = ?5",
        params![lat, lng, loc.accuracy_m, ts_to_db(loc.confirmed_at), event_id],
    )?;
    Ok(n == 1)
}

/// Replace the event's link slot; the previous token stops resolving.
pub fn update_link(conn: &Connection, event_id: i64, link: &CheckinLink) -> AppResult<bool> {
    let n = conn.execute(
        "UPDATE events
         SET link_token = ?1, link_issued_at = ?2, link_expires_at = ?3
         WHERE id = ?4",
        params![
            link.token,
            ts_to_db(link.issued_at),
            ts_to_db(link.expires_at),
            event_id
        ],
    )?;
    Ok(n == 1)
}

pub fn has_record_for_user(conn: &Connection, event_id: i64, user_id: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM attendance_records WHERE event_id = ?1 AND user_id = ?2 LIMIT 1",
    )?;
    Ok(stmt.exists(params![event_id, user_id])?)
}

/// A verdict about to be written.
#[derive(Debug, Clone)]
pub struct NewAttendance<'a> {
    pub event_id: i64,
    pub user_id: Option<&'a str>,
    pub student_number: Option<&'a str>,
    pub coordinate: Coordinate,
    pub accuracy_m: f64,
    pub distance_m: f64,
    pub device_info: Option<&'a str>,
    pub status: AttendanceStatus,
    pub rejection_reason: Option<String>,
    pub checkin_time: DateTime<Utc>,
}

/// Insert-or-reject: the partial unique index on (event_id, user_id) turns a
/// second record for a known user into `AlreadyCheckedIn`.
pub fn insert_attendance(conn: &Connection, rec: &NewAttendance) -> AppResult<AttendanceRecord> {
    let (lat, lng) = rec.coordinate.to_db_strings();
    let accuracy = accuracy_to_db(rec.accuracy_m);

    let res = conn.execute(
        "INSERT INTO attendance_records
            (event_id, user_id, student_number, lat, lng, accuracy_m, distance_m,
             device_info, status, rejection_reason, checkin_time)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            rec.event_id,
            rec.user_id,
            rec.student_number,
            lat,
            lng,
            accuracy,
            distance_to_db(rec.distance_m),
            rec.device_info,
            rec.status.to_db_str(),
            rec.rejection_reason,
            ts_to_db(rec.checkin_time),
        ],
    );

    match res {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            return Err(AppError::AlreadyCheckedIn);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(AttendanceRecord {
        id: conn.last_insert_rowid(),
        event_id: rec.event_id,
        user_id: rec.user_id.map(str::to_string),
        student_number: rec.student_number.map(str::to_string),
        coordinate: rec.coordinate,
        accuracy_m: accuracy,
        distance_m: rec.distance_m,
        device_info: rec.device_info.map(str::to_string),
        status: rec.status,
        rejection_reason: rec.rejection_reason.clone(),
        checkin_time: rec.checkin_time,
    })
}

pub fn map_attendance_row(row: &Row) -> rusqlite::Result<AttendanceRecord> {
    let lat: String = row.get("lat")?;
    let lng: String = row.get("lng")?;
    let coordinate = Coordinate::from_db_strs(&lat, &lng).map_err(|e| conversion_failure(4, e))?;

    let distance_str: String = row.get("distance_m")?;
    let distance_m = distance_str.trim().parse::<f64>().map_err(|_| {
        conversion_failure(
            7,
            AppError::CorruptRow(format!("bad distance '{}'", distance_str)),
        )
    })?;

    let status_str: String = row.get("status")?;
    let status = AttendanceStatus::from_db_str(&status_str).ok_or_else(|| {
        conversion_failure(
            9,
            AppError::CorruptRow(format!("bad status '{}'", status_str)),
        )
    })?;

    let checkin_time: String = row.get("checkin_time")?;

    Ok(AttendanceRecord {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        user_id: row.get("user_id")?,
        student_number: row.get("student_number")?,
        coordinate,
        accuracy_m: row.get("accuracy_m")?,
        distance_m,
        device_info: row.get("device_info")?,
        status,
        rejection_reason: row.get("rejection_reason")?,
        checkin_time: ts_from_db(&checkin_time).map_err(|e| conversion_failure(11, e))?,
    })
}

/// All records of an event, newest first.
pub fn load_attendance_by_event(conn: &Connection, event_id: i64) -> AppResult<Vec<AttendanceRecord>> {
    let sql = format!(
        "SELECT {} FROM attendance_records
         WHERE event_id = ?1
         ORDER BY checkin_time DESC, id DESC",
        ATTENDANCE_COLUMNS
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([event_id], map_attendance_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// All records of one attendee across events, newest first.
pub fn load_attendance_by_user(conn: &Connection, user_id: &str) -> AppResult<Vec<AttendanceRecord>> {
    let sql = format!(
        "SELECT {} FROM attendance_records
         WHERE user_id = ?1
         ORDER BY checkin_time DESC, id DESC",
        ATTENDANCE_COLUMNS
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([user_id], map_attendance_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
