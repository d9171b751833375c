use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use ansi_term::Colour;
use regex::Regex;

const MAX_OP_WIDTH: usize = 48;

/// One row of the internal `log` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

fn color_for_operation(op: &str) -> Colour {
    match op {
        "start" => Colour::Green,
        "stop" => Colour::Cyan,
        "cleanup" => Colour::Red,
        "export" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// Truncate to `max` visible characters, ignoring ANSI sequences.
fn fit_visible(ansi: &Regex, s: &str, max: usize) -> String {
    let visible = ansi.replace_all(s, "");
    if visible.chars().count() <= max {
        return visible.into_owned();
    }
    let mut out: String = visible.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

pub struct LogLogic;

impl LogLogic {
    pub fn entries(pool: &DbPool) -> AppResult<Vec<LogEntry>> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(LogEntry {
                id: row.get(0)?,
                date: row.get(1)?,
                operation: row.get(2)?,
                target: row.get(3)?,
                message: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }
        Ok(entries)
    }

    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = Self::entries(pool)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let ansi = Regex::new(r"\x1B\[[0-9;]*[mK]").map_err(|e| AppError::Other(e.to_string()))?;

        let labels: Vec<String> = entries
            .iter()
            .map(|e| {
                let label = if e.target.is_empty() {
                    e.operation.clone()
                } else {
                    format!("{} ({})", e.operation, e.target)
                };
                fit_visible(&ansi, &label, MAX_OP_WIDTH)
            })
            .collect();

        let op_w = labels.iter().map(|l| l.chars().count()).max().unwrap_or(10);
        let id_w = entries.iter().map(|e| e.id.to_string().len()).max().unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (entry, label) in entries.iter().zip(labels) {
            let color = color_for_operation(&entry.operation);
            let padding = " ".repeat(op_w.saturating_sub(label.chars().count()));

            // only the operation word is coloured
            let painted = match label.split_once(' ') {
                Some((op, rest)) => format!("{} {}", color.paint(op), rest),
                None => color.paint(label.as_str()).to_string(),
            };

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                entry.id, entry.date, painted, padding, entry.message,
            );
        }

        Ok(())
    }
}
