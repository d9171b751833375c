use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::list::ListLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::WorkSession;
use crate::utils::colors::{RESET, color_for_status, colorize_optional};
use crate::utils::formatting::pad_right;
use crate::utils::{secs2mmss, secs2readable};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show { id } = cmd {
        let mut pool = DbPool::open(&cfg.database)?;
        let session = ListLogic::get(&mut pool, *id)?;
        print_session(&session);
    }
    Ok(())
}

/// Print one session as a labelled block (times in UTC).
pub fn print_session(s: &WorkSession) {
    let status = s.status();
    let duration = match s.duration {
        Some(secs) => format!("{} ({})", secs2mmss(Some(secs)), secs2readable(secs)),
        None => "-".to_string(),
    };

    let fields = [
        ("Id", s.id.to_string()),
        ("Line", s.line.clone()),
        ("Leg", s.leg.clone()),
        ("Machine", s.machine.clone()),
        ("Operator", s.name.clone().unwrap_or_else(|| "-".into())),
        ("Start", s.start_str()),
        ("End", s.end_str().unwrap_or_else(|| "-".into())),
        ("Duration", duration),
        (
            "ABH",
            s.abh_detected
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".into()),
        ),
    ];

    println!();
    for (label, value) in fields {
        println!("  {} {}", pad_right(&format!("{label}:"), 10), colorize_optional(&value));
    }
    println!(
        "  {} {}{}{}",
        pad_right("Status:", 10),
        color_for_status(status.is_open()),
        status.as_str(),
        RESET
    );
    println!();
}
