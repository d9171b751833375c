use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::export::ExportLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::write_export;
use crate::ui::messages::{success, warning};
use crate::utils::path::expand_tilde;
use std::path::PathBuf;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        from,
        to,
        format,
        out,
        force,
    } = cmd
    {
        let mut pool = DbPool::open(&cfg.database)?;
        let file = ExportLogic::export(&mut pool, from, to, *format, &cfg.export)?;

        let dir = out
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(|| PathBuf::from("."));
        let path = write_export(&dir, &file, *force)?;

        if file.format != *format {
            warning(format!(
                "{} export failed, wrote {} instead",
                format.as_str(),
                file.format.as_str()
            ));
        }
        success(format!("Exported {} sessions to {}", file.rows, path.display()));
    }
    Ok(())
}
