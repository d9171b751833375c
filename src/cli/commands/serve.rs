use crate::api::{self, ApiState};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Serve { host, port } = cmd {
        let mut cfg = cfg.clone();
        if let Some(h) = host {
            cfg.server.host = h.clone();
        }
        if let Some(p) = port {
            cfg.server.port = *p;
        }

        let pool = DbPool::open(&cfg.database)?;
        info(format!(
            "Serving {} on http://{}:{}",
            cfg.database, cfg.server.host, cfg.server.port
        ));

        let state = ApiState::new(pool, cfg);
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(api::start_server(state))?;
    }
    Ok(())
}
