use crate::cli::commands::open_service;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::time::{parse_ttl_seconds, ts_display};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Link { event_id, ttl } = cmd {
        let ttl = ttl.map(parse_ttl_seconds).transpose()?;

        let mut service = open_service(cfg)?;
        let link = service.issue_link(*event_id, ttl)?;

        success(format!(
            "Check-in link for event {} (expires {})",
            event_id,
            ts_display(link.expires_at)
        ));
        println!("token: {}", link.token);
    }
    Ok(())
}
