use crate::cli::commands::show::print_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::stop::StopLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stop { id, abh } = cmd {
        let mut pool = DbPool::open(&cfg.database)?;
        let session = StopLogic::apply(&mut pool, *id, *abh)?;

        success(format!("Session {id} stopped"));
        print_session(&session);
    }
    Ok(())
}
