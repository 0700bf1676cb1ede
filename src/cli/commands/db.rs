use crate::cli::commands::open_service;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::applied_versions;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db { migrate, info: show_info } = cmd {
        let mut service = open_service(cfg)?;

        if *migrate {
            service.init_schema()?;
            success("Database schema is up to date.");
        }

        if *show_info {
            info(format!("Database: {}", cfg.database));
            for v in applied_versions(&service.pool().conn)? {
                println!("  • {}", v);
            }
        }
    }
    Ok(())
}
