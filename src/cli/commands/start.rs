use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::start::StartLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::NewSession;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Start {
        line,
        leg,
        machine,
        name,
    } = cmd
    {
        let new = NewSession::new(line, leg, machine, name.as_deref()).normalized()?;
        cfg.lines.check(&new.line, &new.leg, &new.machine)?;

        let mut pool = DbPool::open(&cfg.database)?;
        let id = StartLogic::apply(&mut pool, &new)?;

        success(format!(
            "Session {id} started ({} / {} / {})",
            new.line, new.leg, new.machine
        ));
    }
    Ok(())
}
