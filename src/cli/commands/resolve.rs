use crate::cli::commands::open_service;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::time::ts_display;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Resolve { token } = cmd {
        let service = open_service(cfg)?;
        let summary = service.resolve_link(token)?;

        info(format!("Event {}: {}", summary.id, summary.title));
        if let Some(d) = &summary.description {
            println!("{}", d);
        }
        println!(
            "Check in within {}m of the venue.",
            summary.radius_m
        );
        if let Some(exp) = summary.link_expires_at {
            println!("Link valid until {}", ts_display(exp));
        }
    }
    Ok(())
}
