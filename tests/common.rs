#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, TimeZone, Utc};
use geoattend::core::clock::ManualClock;
use geoattend::models::coordinate::Coordinate;
use geoattend::{AttendanceService, Settings};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// The binary under test, isolated from the user's real configuration.
pub fn gat(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("geoattend");
    cmd.env("GEOATTEND_HOME", home).env("GEOATTEND_LOG", "warn");
    cmd
}

/// A scratch directory plus the database path inside it.
pub fn setup_test_db(name: &str) -> (TempDir, String) {
    let dir = tempfile::Builder::new()
        .prefix(&format!("geoattend_{}_", name))
        .tempdir()
        .expect("create temp dir");
    let mut path: PathBuf = dir.path().to_path_buf();
    path.push(format!("{}.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    (dir, db_path)
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap()
}

pub fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).expect("valid coordinate")
}

/// Open a service on `db_path` driven by `clock`.
pub fn service(db_path: &str, clock: &Arc<ManualClock>) -> AttendanceService {
    AttendanceService::open(db_path, Settings::default())
        .expect("open service")
        .with_clock(clock.clone())
}

/// Fresh database with schema, plus a clock at `t0()`.
pub fn fresh(name: &str) -> (TempDir, String, Arc<ManualClock>, AttendanceService) {
    let (dir, db_path) = setup_test_db(name);
    let clock = Arc::new(ManualClock::new(t0()));
    let mut svc = service(&db_path, &clock);
    svc.init_schema().expect("init schema");
    (dir, db_path, clock, svc)
}

/// Event with radius `radius_m`, confirmed at `venue`, with a 1h link.
/// Returns (event id, token).
pub fn ready_event(svc: &mut AttendanceService, venue: Coordinate, radius_m: i64) -> (i64, String) {
    let event = svc.create_event("Lecture", Some(radius_m)).expect("create event");
    svc.confirm_location(event.id, venue, 10.0).expect("confirm");
    let link = svc
        .issue_link(event.id, Some(chrono::Duration::hours(1)))
        .expect("issue link");
    (event.id, link.token)
}

/// A point `meters` east of (0, 0) along the equator.
pub fn east_of_origin(meters: f64) -> Coordinate {
    let lng = (meters / geoattend::core::geodesy::EARTH_RADIUS_M).to_degrees();
    coord(0.0, lng)
}
