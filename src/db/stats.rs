use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

/// Aggregate figures about the `work_sessions` table.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub total: i64,
    pub open: i64,
    pub first_start: Option<String>,
    pub last_start: Option<String>,
}

pub fn session_stats(pool: &DbPool) -> rusqlite::Result<SessionStats> {
    let (total, open): (i64, i64) = pool.conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(CASE WHEN end_time IS NULL THEN 1 ELSE 0 END), 0)
         FROM work_sessions",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let (first_start, last_start): (Option<String>, Option<String>) = pool
        .conn
        .query_row(
            "SELECT MIN(start_time), MAX(start_time) FROM work_sessions",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?
        .unwrap_or((None, None));

    Ok(SessionStats {
        total,
        open,
        first_start,
        last_start,
    })
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) SESSION COUNTS
    //
    let stats = session_stats(pool)?;
    println!(
        "{}• Sessions:{} {}{}{} ({} open, {} closed)",
        CYAN,
        RESET,
        GREEN,
        stats.total,
        RESET,
        stats.open,
        stats.total - stats.open
    );

    //
    // 3) DATE RANGE
    //
    match (&stats.first_start, &stats.last_start) {
        (Some(first), Some(last)) => {
            println!("{}• First start:{} {}", CYAN, RESET, first);
            println!("{}• Last start:{}  {}", CYAN, RESET, last);
        }
        _ => println!("{}• No sessions recorded{}", GREY, RESET),
    }

    println!();
    Ok(())
}
