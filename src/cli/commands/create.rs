use crate::cli::commands::open_service;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::event::NewEvent;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Create {
        title,
        radius,
        lead,
        description,
    } = cmd
    {
        let mut service = open_service(cfg)?;

        let mut new = NewEvent::new(title.as_str())
            .radius(radius.unwrap_or(service.settings().default_radius_m));
        if let Some(l) = lead {
            new = new.lead(l.as_str());
        }
        if let Some(d) = description {
            new = new.description(d.as_str());
        }

        let event = service.create_event_with(&new)?;
        success(format!(
            "Created event {} '{}' (radius {}m)",
            event.id, event.title, event.radius_m
        ));
        println!("Next: confirm the venue location with `geoattend confirm {}`", event.id);
    }
    Ok(())
}
