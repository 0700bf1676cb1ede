pub mod checkin;
pub mod config;
pub mod confirm;
pub mod create;
pub mod db;
pub mod init;
pub mod link;
pub mod list;
pub mod log;
pub mod resolve;
pub mod show;

use crate::config::Config;
use crate::core::service::{AttendanceService, Settings};
use crate::errors::AppResult;

/// Open the attendance service on the configured database.
pub(crate) fn open_service(cfg: &Config) -> AppResult<AttendanceService> {
    AttendanceService::open(&cfg.database, Settings::from_config(cfg)?)
}
