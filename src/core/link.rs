use crate::core::token::generate_token;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{load_event, load_event_by_token, update_link};
use crate::errors::{AppError, AppResult, LinkError};
use crate::models::event::{CheckinLink, Event};
use crate::utils::time::expiry_after;
use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use tracing::{debug, info};

/// Default lifetime of a freshly issued link, in hours.
pub const DEFAULT_LINK_TTL_HOURS: i64 = 24;

pub struct LinkLogic;

impl LinkLogic {
    /// Mint a new token for the event, replacing (and killing) any previous one.
    pub fn issue(
        pool: &mut DbPool,
        now: DateTime<Utc>,
        event_id: i64,
        ttl: Duration,
    ) -> AppResult<CheckinLink> {
        if ttl <= Duration::zero() {
            return Err(AppError::InvalidTtl(format!(
                "{}s: the link must outlive its issue time",
                ttl.num_seconds()
            )));
        }

        let expires_at = expiry_after(now, ttl)?;

        let tx = pool.conn.transaction()?;

        let event = load_event(&tx, event_id)?.ok_or(AppError::EventNotFound(event_id))?;
        if event.location.is_none() {
            return Err(AppError::PreconditionFailed(
                "confirm the event location before generating a check-in link".into(),
            ));
        }

        let link = CheckinLink {
            token: generate_token(),
            issued_at: now,
            expires_at,
        };
        update_link(&tx, event_id, &link)?;
        ttlog(
            &tx,
            now,
            "issue_link",
            &event_id.to_string(),
            &format!("Link valid until {}", link.expires_at.to_rfc3339()),
        )?;
        tx.commit()?;

        info!(event_id, expires_at = %link.expires_at, replaced = event.link.is_some(), "check-in link issued");
        Ok(link)
    }

    /// Resolve a token to its event. Read-only; the token is not consumed.
    pub fn resolve(pool: &DbPool, now: DateTime<Utc>, token: &str) -> AppResult<Event> {
        resolve_on(&pool.conn, now, token)
    }
}

/// Token resolution on an already open connection or transaction.
pub(crate) fn resolve_on(conn: &Connection, now: DateTime<Utc>, token: &str) -> AppResult<Event> {
    let token = token.trim();
    if token.is_empty() {
        return Err(LinkError::NotFound.into());
    }

    let event = load_event_by_token(conn, token)?.ok_or(LinkError::NotFound)?;
    ensure_link_usable(&event, now)?;

    debug!(event_id = event.id, "token resolved");
    Ok(event)
}

/// The event's current link must be live and its location confirmed.
pub(crate) fn ensure_link_usable(event: &Event, now: DateTime<Utc>) -> Result<(), LinkError> {
    let link = event.link.as_ref().ok_or(LinkError::NotFound)?;
    if !link.is_live_at(now) {
        return Err(LinkError::Expired);
    }
    if event.location.is_none() {
        return Err(LinkError::LocationNotConfirmed);
    }
    Ok(())
}
