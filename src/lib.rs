//! cil-tracker library root.
//! Exposes the CLI parser, the HTTP API, the high-level run() function and
//! the internal modules.

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod logging;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use crate::core::cleanup::CleanupLogic;
use crate::db::pool::DbPool;
use errors::AppResult;

/// Purge sessions older than the retention window before a command that
/// reads or writes sessions.
fn retention_hook(cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::open(&cfg.database)?;
    CleanupLogic::sweep(&mut pool, cfg.retention_days)?;
    Ok(())
}

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if cli.command.touches_sessions() {
        retention_hook(cfg)?;
    }

    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Start { .. } => cli::commands::start::handle(&cli.command, cfg),
        Commands::Stop { .. } => cli::commands::stop::handle(&cli.command, cfg),
        Commands::Show { .. } => cli::commands::show::handle(&cli.command, cfg),
        Commands::List => cli::commands::list::handle(&cli.command, cfg),
        Commands::Cleanup { .. } => cli::commands::cleanup::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::Lines => cli::commands::lines::handle(cfg),
        Commands::Serve { .. } => cli::commands::serve::handle(&cli.command, cfg),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let level = if matches!(cli.command, Commands::Serve { .. }) {
        "info"
    } else {
        "warn"
    };
    logging::init_logging(level);

    // config is loaded once; --db wins over file and environment
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
