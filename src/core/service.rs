//! Boundary operations offered to the surrounding application.

use crate::config::Config;
use crate::core::clock::{Clock, SystemClock};
use crate::core::confirm::ConfirmLogic;
use crate::core::event::EventLogic;
use crate::core::ledger::{AttendanceSink, LedgerLogic};
use crate::core::link::{DEFAULT_LINK_TTL_HOURS, LinkLogic};
use crate::core::verify::CheckinLogic;
use crate::db::initialize::init_db;
use crate::db::pool::{DEFAULT_STORAGE_TIMEOUT, DbPool};
use crate::errors::{AppError, AppResult};
use crate::models::attempt::{CheckinAttempt, CheckinTarget};
use crate::models::attendance::AttendanceRecord;
use crate::models::coordinate::Coordinate;
use crate::models::event::{
    CheckinLink, ConfirmedLocation, DEFAULT_RADIUS_M, Event, EventSummary, NewEvent,
    validate_radius,
};
use chrono::Duration;
use std::sync::Arc;

/// Tunables taken from the configuration file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub default_radius_m: i64,
    pub link_ttl: Duration,
    pub storage_timeout: std::time::Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_radius_m: DEFAULT_RADIUS_M,
            link_ttl: Duration::hours(DEFAULT_LINK_TTL_HOURS),
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }
}

impl Settings {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let default_radius_m = validate_radius(cfg.default_radius_m)
            .map_err(|e| AppError::Config(format!("default_radius_m: {}", e)))?;
        let link_ttl = Duration::try_hours(cfg.link_ttl_hours)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or_else(|| {
                AppError::Config(format!(
                    "link_ttl_hours must be a positive number of hours, got {}",
                    cfg.link_ttl_hours
                ))
            })?;
        Ok(Self {
            default_radius_m,
            link_ttl,
            storage_timeout: std::time::Duration::from_millis(cfg.storage_timeout_ms),
        })
    }
}

/// One connection's worth of attendance operations.
///
/// Open one service per thread or process; they coordinate through the
/// database file.
pub struct AttendanceService {
    pool: DbPool,
    clock: Arc<dyn Clock>,
    settings: Settings,
    sinks: Vec<Arc<dyn AttendanceSink>>,
}

impl AttendanceService {
    pub fn open(path: &str, settings: Settings) -> AppResult<Self> {
        let pool = DbPool::open(path, settings.storage_timeout)?;
        Ok(Self {
            pool,
            clock: Arc::new(SystemClock),
            settings,
            sinks: Vec::new(),
        })
    }

    /// Create or upgrade the schema.
    pub fn init_schema(&mut self) -> AppResult<()> {
        self.pool.with_conn(|conn| init_db(conn))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn subscribe(&mut self, sink: Arc<dyn AttendanceSink>) {
        self.sinks.push(sink);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// `radius_m = None` takes the configured default.
    pub fn create_event(&mut self, title: &str, radius_m: Option<i64>) -> AppResult<Event> {
        let new = NewEvent::new(title).radius(radius_m.unwrap_or(self.settings.default_radius_m));
        self.create_event_with(&new)
    }

    pub fn create_event_with(&mut self, new: &NewEvent) -> AppResult<Event> {
        EventLogic::create(&mut self.pool, self.clock.now(), new)
    }

    pub fn get_event(&self, event_id: i64) -> AppResult<Event> {
        EventLogic::get(&self.pool, event_id)
    }

    pub fn confirm_location(
        &mut self,
        event_id: i64,
        coordinate: Coordinate,
        accuracy_m: f64,
    ) -> AppResult<ConfirmedLocation> {
        ConfirmLogic::apply(&mut self.pool, self.clock.now(), event_id, coordinate, accuracy_m)
    }

    /// `ttl = None` takes the configured default (24h unless overridden).
    pub fn issue_link(&mut self, event_id: i64, ttl: Option<Duration>) -> AppResult<CheckinLink> {
        let ttl = ttl.unwrap_or(self.settings.link_ttl);
        LinkLogic::issue(&mut self.pool, self.clock.now(), event_id, ttl)
    }

    pub fn resolve_link(&self, token: &str) -> AppResult<EventSummary> {
        LinkLogic::resolve(&self.pool, self.clock.now(), token).map(|e| e.summary())
    }

    pub fn submit_checkin(
        &mut self,
        target: &CheckinTarget,
        attempt: &CheckinAttempt,
    ) -> AppResult<AttendanceRecord> {
        let record = CheckinLogic::submit(&mut self.pool, self.clock.now(), target, attempt)?;
        for sink in &self.sinks {
            sink.record_added(&record);
        }
        Ok(record)
    }

    pub fn list_attendance(&self, event_id: i64) -> AppResult<Vec<AttendanceRecord>> {
        LedgerLogic::for_event(&self.pool, event_id)
    }

    pub fn list_attendance_for_user(&self, user_id: &str) -> AppResult<Vec<AttendanceRecord>> {
        LedgerLogic::for_user(&self.pool, user_id)
    }
}
