use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::cleanup::CleanupLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Cleanup { days } = cmd {
        let days = days.unwrap_or(cfg.retention_days);
        let mut pool = DbPool::open(&cfg.database)?;
        let deleted = CleanupLogic::sweep(&mut pool, days)?;

        if deleted == 0 {
            info(format!("No sessions older than {days} days"));
        } else {
            success(format!("Deleted {deleted} sessions older than {days} days"));
        }
    }
    Ok(())
}
