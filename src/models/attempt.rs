use super::coordinate::{Coordinate, validate_accuracy};
use crate::errors::{AppError, AppResult};

/// Who is checking in. Passed explicitly; never read from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub student_number: Option<String>,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            student_number: None,
        }
    }

    pub fn with_student_number(mut self, number: impl Into<String>) -> Self {
        self.student_number = Some(number.into());
        self
    }

    /// A blank user id would take part in the duplicate guard as a real identity.
    pub fn validate(&self) -> AppResult<()> {
        if self.user_id.trim().is_empty() {
            return Err(AppError::InvalidIdentity(
                "user id must not be blank; omit it for an anonymous check-in".into(),
            ));
        }
        Ok(())
    }
}

/// A single check-in submission. Not persisted as-is.
#[derive(Debug, Clone)]
pub struct CheckinAttempt {
    pub coordinate: Coordinate,
    pub accuracy_m: f64,
    pub identity: Option<Identity>,
    pub device_info: Option<String>,
}

impl CheckinAttempt {
    pub fn new(coordinate: Coordinate, accuracy_m: f64) -> AppResult<Self> {
        Ok(Self {
            coordinate,
            accuracy_m: validate_accuracy(accuracy_m)?,
            identity: None,
            device_info: None,
        })
    }

    pub fn by(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_device(mut self, device_info: impl Into<String>) -> Self {
        self.device_info = Some(device_info.into());
        self
    }
}

/// How a check-in names its event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckinTarget {
    Token(String),
    Event(i64),
}
