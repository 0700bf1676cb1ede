use crate::cli::commands::open_service;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::utils::time::ts_display;
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show { event_id } = cmd {
        let service = open_service(cfg)?;
        let event = service.get_event(*event_id)?;

        println!("\n=== Event {} ===", event.id);
        println!("Title    : {}", event.title);
        if let Some(d) = &event.description {
            println!("About    : {}", d);
        }
        println!("Radius   : {}m", event.radius_m);

        match &event.location {
            Some(loc) => println!(
                "Location : {}, {} (±{}m, confirmed {})",
                loc.coordinate.lat(),
                loc.coordinate.lng(),
                loc.accuracy_m,
                ts_display(loc.confirmed_at)
            ),
            None => println!("Location : not confirmed"),
        }

        match &event.link {
            Some(link) => {
                let state = if link.is_live_at(Utc::now()) {
                    "active"
                } else {
                    "expired"
                };
                println!(
                    "Link     : {} ({}, expires {})",
                    link.token,
                    state,
                    ts_display(link.expires_at)
                );
            }
            None => println!("Link     : none"),
        }
    }
    Ok(())
}
