//! geoattend main entrypoint.

use geoattend::run;
use geoattend::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
