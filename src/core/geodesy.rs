//! Great-circle distance on a fixed sphere.

use crate::models::coordinate::Coordinate;

/// Mean Earth radius used by every distance computation, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters between two coordinates.
///
/// Symmetric, zero for identical points and continuous across the
/// antimeridian and the poles. Never negative.
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let d_lat = (b.lat() - a.lat()).abs().to_radians();
    let d_lng = (b.lng() - a.lng()).abs().to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // rounding can push h a hair past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}
