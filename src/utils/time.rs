//! Time utilities: DB timestamp encoding, TTL parsing, display formatting.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Encode a timestamp for storage. Fixed-width UTC with microseconds, so
/// string order is chronological order.
pub fn ts_to_db(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn ts_from_db(s: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::InvalidTimestamp(s.to_string()))
}

/// Last second the fixed-width storage format can hold (9999-12-31T23:59:59Z).
const MAX_STORABLE_SECS: i64 = 253_402_300_799;

/// `now + ttl`, refusing overflow and anything past the storable range.
pub fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> AppResult<DateTime<Utc>> {
    now.checked_add_signed(ttl)
        .filter(|t| t.timestamp() <= MAX_STORABLE_SECS)
        .ok_or_else(|| {
            AppError::InvalidTtl(format!(
                "{}s: the link would expire after 9999-12-31",
                ttl.num_seconds()
            ))
        })
}

/// Local, human-readable rendering for CLI output.
pub fn ts_display(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Parse a link lifetime given in whole seconds.
pub fn parse_ttl_seconds(secs: i64) -> AppResult<Duration> {
    if secs <= 0 {
        return Err(AppError::InvalidTtl(format!(
            "{} seconds: the link must outlive its issue time",
            secs
        )));
    }
    Duration::try_seconds(secs).ok_or_else(|| AppError::InvalidTtl(format!("{} seconds", secs)))
}
