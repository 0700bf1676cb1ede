use crate::cli::commands::open_service;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::coordinate::Coordinate;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Confirm {
        event_id,
        lat,
        lng,
        accuracy,
    } = cmd
    {
        let coordinate = Coordinate::new(*lat, *lng)?;
        let mut service = open_service(cfg)?;
        let loc = service.confirm_location(*event_id, coordinate, *accuracy)?;

        success(format!(
            "Location confirmed for event {}: {}, {} (accuracy {}m)",
            event_id,
            loc.coordinate.lat(),
            loc.coordinate.lng(),
            loc.accuracy_m
        ));
    }
    Ok(())
}
