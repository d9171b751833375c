use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{pending_migrations, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    {
        if !(*migrate || *check || *vacuum || *show_info) {
            info("Nothing to do: use --migrate, --check, --vacuum or --info");
            return Ok(());
        }

        // Plain connection: migrations only run when asked for.
        let mut pool = DbPool::new(&cfg.database)?;

        //
        // 1) MIGRATE
        //
        if *migrate {
            let pending = pending_migrations(&pool.conn)?;
            if pending.is_empty() {
                println!("{}✔ Schema is up to date.{}\n", GREEN, RESET);
            } else {
                println!("{}▶ Running {} migrations…{}", CYAN, pending.len(), RESET);
                for id in &pending {
                    println!("   - {id}");
                }
                run_pending_migrations(&pool.conn)?;
                println!("{}✔ Migration completed.{}\n", GREEN, RESET);
            }
        }

        //
        // 2) INFO
        //
        if *show_info {
            stats::print_db_info(&mut pool, &cfg.database)?;
        }

        //
        // 3) CHECK
        //
        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
            }
        }

        //
        // 4) VACUUM
        //
        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            pool.conn.execute_batch("VACUUM;")?;
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}
