use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// A point on the globe in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite values and out-of-range degrees.
    pub fn new(lat: f64, lng: f64) -> AppResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::InvalidCoordinate(format!(
                "latitude {} is outside [-90, 90]",
                lat
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(AppError::InvalidCoordinate(format!(
                "longitude {} is outside [-180, 180]",
                lng
            )));
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Convert → DB strings. `f64`'s `Display` is the shortest string that
    /// parses back to the same bits, so nothing drifts through storage.
    pub fn to_db_strings(&self) -> (String, String) {
        (self.lat.to_string(), self.lng.to_string())
    }

    /// Convert DB strings → coordinate
    pub fn from_db_strs(lat: &str, lng: &str) -> AppResult<Self> {
        let parse = |s: &str| {
            s.trim()
                .parse::<f64>()
                .map_err(|_| AppError::CorruptRow(format!("bad coordinate component '{}'", s)))
        };
        Self::new(parse(lat)?, parse(lng)?)
    }
}

/// Validate a device-reported accuracy radius (meters).
pub fn validate_accuracy(accuracy_m: f64) -> AppResult<f64> {
    if !accuracy_m.is_finite() || accuracy_m < 0.0 {
        return Err(AppError::InvalidAccuracy(format!(
            "{} is not a non-negative number of meters",
            accuracy_m
        )));
    }
    Ok(accuracy_m)
}

/// Accuracy is persisted as a whole meter count.
pub fn accuracy_to_db(accuracy_m: f64) -> i64 {
    accuracy_m.round() as i64
}

/// Round a distance to the 2 decimals it is stored with.
pub fn round_distance(distance_m: f64) -> f64 {
    (distance_m * 100.0).round() / 100.0
}

pub fn distance_to_db(distance_m: f64) -> String {
    format!("{:.2}", distance_m)
}
