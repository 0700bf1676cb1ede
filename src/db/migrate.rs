use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

/// One schema step, applied at most once and recorded in the `log` table.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250912_0001_create_events",
        description: "Created events table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS events (
            id                    INTEGER PRIMARY KEY AUTOINCREMENT,
            title                 TEXT NOT NULL,
            description           TEXT,
            lead_id               TEXT,
            radius_meters         INTEGER NOT NULL DEFAULT 50
                                  CHECK(radius_meters BETWEEN 10 AND 1000),
            starts_at             TEXT,
            ends_at               TEXT,
            location_lat          TEXT,
            location_lng          TEXT,
            location_accuracy_m   INTEGER,
            location_confirmed_at TEXT,
            link_token            TEXT UNIQUE,
            link_issued_at        TEXT,
            link_expires_at       TEXT,
            created_at            TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250912_0002_create_attendance_records",
        description: "Created attendance_records table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS attendance_records (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id         INTEGER NOT NULL REFERENCES events(id),
            user_id          TEXT,
            student_number   TEXT,
            lat              TEXT NOT NULL,
            lng              TEXT NOT NULL,
            accuracy_m       INTEGER NOT NULL,
            distance_m       TEXT NOT NULL,
            device_info      TEXT,
            status           TEXT NOT NULL CHECK(status IN ('present','absent','invalid')),
            rejection_reason TEXT,
            checkin_time     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_event_time
            ON attendance_records(event_id, checkin_time);
        CREATE INDEX IF NOT EXISTS idx_attendance_user_time
            ON attendance_records(user_id, checkin_time);
        "#,
    },
    Migration {
        version: "20250930_0003_attendance_identity_unique",
        description: "One record per (event, user) when the user is known",
        sql: r#"
        CREATE UNIQUE INDEX IF NOT EXISTS ux_attendance_event_user
            ON attendance_records(event_id, user_id)
            WHERE user_id IS NOT NULL;
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()?;
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db(). Safe to call repeatedly.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            debug!(version = m.version, "migration already applied");
            continue;
        }
        apply(conn, m)?;
        info!(version = m.version, "migration applied");
        success(format!("Migration applied: {} → {}", m.version, m.description));
    }

    Ok(())
}

/// Versions recorded as applied, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
