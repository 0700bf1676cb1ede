//! Formatting utilities used for CLI outputs.

/// Human-readable distance: meters below 1 km, kilometers above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.1}m", meters)
    } else {
        format!("{:.2}km", meters / 1000.0)
    }
}
