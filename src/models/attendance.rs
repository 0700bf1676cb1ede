use super::coordinate::Coordinate;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    /// Kept for stored rows written by other tools; the verifier never produces it.
    Invalid,
}

impl AttendanceStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Invalid => "invalid",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "present" => Some(AttendanceStatus::Present),
            "absent" => Some(AttendanceStatus::Absent),
            "invalid" => Some(AttendanceStatus::Invalid),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, AttendanceStatus::Present)
    }
}

/// One stored verdict. Immutable once written.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub event_id: i64,                     // ⇔ attendance_records.event_id
    pub user_id: Option<String>,           // NULL for anonymous check-ins
    pub student_number: Option<String>,
    pub coordinate: Coordinate,            // ⇔ lat / lng (TEXT)
    pub accuracy_m: i64,                   // ⇔ accuracy_m (INTEGER)
    pub distance_m: f64,                   // ⇔ distance_m (TEXT, 2 decimals)
    pub device_info: Option<String>,
    pub status: AttendanceStatus,
    pub rejection_reason: Option<String>,  // set iff status != present
    pub checkin_time: DateTime<Utc>,
}

impl AttendanceRecord {
    pub fn is_present(&self) -> bool {
        self.status.is_present()
    }

    pub fn distance_str(&self) -> String {
        format!("{:.2}", self.distance_m)
    }
}

/// Reason stored on records that fall outside the geofence.
pub fn outside_radius_reason(distance_m: f64) -> String {
    format!("Outside check-in radius ({:.2}m from venue)", distance_m)
}
