use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::list::ListLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::WorkSession;
use crate::utils::secs2mmss;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::List) {
        let mut pool = DbPool::open(&cfg.database)?;
        let sessions = ListLogic::all(&mut pool)?;

        if sessions.is_empty() {
            println!("No sessions recorded.");
            return Ok(());
        }

        print!("{}", sessions_table(&sessions).render());
        let open = sessions.iter().filter(|s| s.is_open()).count();
        println!("\n{} sessions ({} open)", sessions.len(), open);
    }
    Ok(())
}

fn sessions_table(sessions: &[WorkSession]) -> Table {
    let mut table = Table::new(&[
        "ID",
        "LINE",
        "LEG",
        "MACHINE",
        "START (UTC)",
        "END (UTC)",
        "DURATION",
        "OPERATOR",
        "ABH",
        "STATUS",
    ]);

    for s in sessions {
        table.add_row(vec![
            s.id.to_string(),
            s.line.clone(),
            s.leg.clone(),
            s.machine.clone(),
            s.start_str(),
            s.end_str().unwrap_or_else(|| "-".into()),
            secs2mmss(s.duration),
            s.name.clone().unwrap_or_else(|| "-".into()),
            s.abh_detected
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".into()),
            s.status().as_str().to_string(),
        ]);
    }
    table
}
