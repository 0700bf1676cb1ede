//! geoattend library root.
//! Exposes the attendance verification engine, the CLI parser and the
//! high-level run() function.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod logging;
pub mod models;
pub mod ui;
pub mod utils;

pub use crate::core::service::{AttendanceService, Settings};
pub use errors::{AppError, AppResult, ErrorKind, LinkError};

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Create { .. } => cli::commands::create::handle(&cli.command, cfg),
        Commands::Show { .. } => cli::commands::show::handle(&cli.command, cfg),
        Commands::Confirm { .. } => cli::commands::confirm::handle(&cli.command, cfg),
        Commands::Link { .. } => cli::commands::link::handle(&cli.command, cfg),
        Commands::Resolve { .. } => cli::commands::resolve::handle(&cli.command, cfg),
        Commands::Checkin { .. } => cli::commands::checkin::handle(&cli.command, cfg),
        Commands::List { .. } => cli::commands::list::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    // --db wins over the configured database
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    logging::init(&cfg.log_filter);

    dispatch(&cli, &cfg)
}
