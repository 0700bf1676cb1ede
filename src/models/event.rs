use super::coordinate::Coordinate;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const MIN_RADIUS_M: i64 = 10;
pub const MAX_RADIUS_M: i64 = 1000;
pub const DEFAULT_RADIUS_M: i64 = 50;

/// The organizer's confirmed reference point.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmedLocation {
    pub coordinate: Coordinate,
    pub accuracy_m: i64,
    pub confirmed_at: DateTime<Utc>,
}

/// The single active check-in credential of an event.
#[derive(Debug, Clone, Serialize)]
pub struct CheckinLink {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CheckinLink {
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub lead_id: Option<String>,
    pub radius_m: i64,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<ConfirmedLocation>,
    pub link: Option<CheckinLink>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn summary(&self) -> EventSummary {
        EventSummary {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            radius_m: self.radius_m,
            link_expires_at: self.link.as_ref().map(|l| l.expires_at),
        }
    }
}

/// What an attendee learns about an event when opening its link.
#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub radius_m: i64,
    pub link_expires_at: Option<DateTime<Utc>>,
}

/// Input for creating an event row.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub lead_id: Option<String>,
    pub radius_m: i64,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl NewEvent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            lead_id: None,
            radius_m: DEFAULT_RADIUS_M,
            starts_at: None,
            ends_at: None,
        }
    }

    pub fn radius(mut self, radius_m: i64) -> Self {
        self.radius_m = radius_m;
        self
    }

    pub fn lead(mut self, lead_id: impl Into<String>) -> Self {
        self.lead_id = Some(lead_id.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn window(mut self, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Self {
        self.starts_at = Some(starts_at);
        self.ends_at = Some(ends_at);
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::InvalidEvent("title must not be empty".into()));
        }
        validate_radius(self.radius_m)?;
        if let (Some(start), Some(end)) = (self.starts_at, self.ends_at)
            && end <= start
        {
            return Err(AppError::InvalidEvent(
                "end time must be after start time".into(),
            ));
        }
        Ok(())
    }
}

pub fn validate_radius(radius_m: i64) -> AppResult<i64> {
    if (MIN_RADIUS_M..=MAX_RADIUS_M).contains(&radius_m) {
        Ok(radius_m)
    } else {
        Err(AppError::InvalidRadius(radius_m))
    }
}
