use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::service::{AttendanceService, Settings};
use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use chrono::Utc;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;

    println!("⚙️  Initializing geoattend…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &cfg.database);

    let mut service = AttendanceService::open(&cfg.database, Settings::from_config(&cfg)?)?;
    service.init_schema()?;

    // audit entry is best effort
    if let Err(e) = ttlog(
        &service.pool().conn,
        Utc::now(),
        "init",
        "",
        &format!("Database initialized at {}", &cfg.database),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    success(format!("Database initialized at {}", &cfg.database));
    Ok(())
}
