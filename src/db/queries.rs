//! Row-level access to `work_sessions`.

use crate::errors::{AppError, AppResult};
use crate::models::{NewSession, WorkSession};
use crate::utils::time::{from_storage, to_storage};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const SELECT_COLUMNS: &str =
    "SELECT id, name, line, leg, machine, start_time, end_time, duration, abh_detected
     FROM work_sessions";

pub(crate) fn parse_ts(idx: usize, raw: String) -> Result<NaiveDateTime> {
    from_storage(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(raw.clone())),
        )
    })
}

pub fn map_row(row: &Row) -> Result<WorkSession> {
    let start_raw: String = row.get("start_time")?;
    let end_raw: Option<String> = row.get("end_time")?;

    let start_time = parse_ts(5, start_raw)?;
    let end_time = match end_raw {
        Some(raw) => Some(parse_ts(6, raw)?),
        None => None,
    };

    Ok(WorkSession {
        id: row.get("id")?,
        name: row.get("name")?,
        line: row.get("line")?,
        leg: row.get("leg")?,
        machine: row.get("machine")?,
        start_time,
        end_time,
        duration: row.get("duration")?,
        abh_detected: row.get("abh_detected")?,
    })
}

/// Insert an open session and return its id.
pub fn insert_session(conn: &Connection, new: &NewSession, start: &NaiveDateTime) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO work_sessions (name, line, leg, machine, start_time)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![new.name, new.line, new.leg, new.machine, to_storage(start)],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_session(conn: &Connection, id: i64) -> AppResult<Option<WorkSession>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

/// Close an open session. Returns `false` when no open row with this id
/// exists, so a concurrent second stop never overwrites the first.
pub fn close_session(
    conn: &Connection,
    id: i64,
    end: &NaiveDateTime,
    duration: i64,
    abh_detected: Option<i64>,
) -> AppResult<bool> {
    let changed = conn.execute(
        "UPDATE work_sessions
         SET end_time = ?1, duration = ?2, abh_detected = COALESCE(?3, abh_detected)
         WHERE id = ?4 AND end_time IS NULL",
        params![to_storage(end), duration, abh_detected, id],
    )?;
    Ok(changed == 1)
}

/// All sessions, most recent start first.
pub fn load_all_sessions(conn: &Connection) -> AppResult<Vec<WorkSession>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} ORDER BY start_time DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Closed sessions with `lower <= start_time < upper`, most recent first.
pub fn load_closed_between(
    conn: &Connection,
    lower: &NaiveDateTime,
    upper: &NaiveDateTime,
) -> AppResult<Vec<WorkSession>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS}
         WHERE start_time >= ?1 AND start_time < ?2 AND end_time IS NOT NULL
         ORDER BY start_time DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![to_storage(lower), to_storage(upper)], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Delete every session started strictly before `cutoff`.
pub fn delete_started_before(conn: &Connection, cutoff: &NaiveDateTime) -> AppResult<usize> {
    let deleted = conn.execute(
        "DELETE FROM work_sessions WHERE start_time < ?1",
        [to_storage(cutoff)],
    )?;
    Ok(deleted)
}
