use crate::config::ExportConfig;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::load_closed_between;
use crate::errors::{AppError, AppResult};
use crate::export::{ExportFile, ExportFormat, SessionExport, render};
use crate::utils::date::{day_bounds, parse_date};
use chrono::NaiveDate;

pub struct ExportLogic;

impl ExportLogic {
    /// Export closed sessions whose start falls on any day of
    /// `start_date..=end_date` (both `YYYY-MM-DD`).
    ///
    /// Sessions still open are never exported. An empty selection is an
    /// error (`NoDataForRange`) rather than an empty file.
    pub fn export(
        pool: &mut DbPool,
        start_date: &str,
        end_date: &str,
        format: ExportFormat,
        cfg: &ExportConfig,
    ) -> AppResult<ExportFile> {
        let (start, end) = parse_range(start_date, end_date)?;

        let (lower, upper) = day_bounds(start, end)
            .ok_or_else(|| AppError::InvalidDate(end_date.to_string()))?;

        let sessions = load_closed_between(&pool.conn, &lower, &upper)?;
        if sessions.is_empty() {
            return Err(AppError::NoDataForRange);
        }

        let rows: Vec<SessionExport> = sessions
            .iter()
            .map(|s| SessionExport::from_session(s, cfg.utc_offset_minutes))
            .collect();

        let file = render(&rows, start, end, format, cfg.include_operator_columns)?;

        audit(
            &pool.conn,
            "export",
            &file.file_name,
            &format!("{} sessions as {}", file.rows, file.format.as_str()),
        );
        tracing::info!(
            rows = file.rows,
            format = file.format.as_str(),
            file = %file.file_name,
            "sessions exported"
        );

        Ok(file)
    }
}

fn parse_range(start_date: &str, end_date: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let start =
        parse_date(start_date).ok_or_else(|| AppError::InvalidDate(start_date.to_string()))?;
    let end = parse_date(end_date).ok_or_else(|| AppError::InvalidDate(end_date.to_string()))?;

    if end < start {
        return Err(AppError::InvalidInput(format!(
            "end date {end} is before start date {start}"
        )));
    }

    Ok((start, end))
}
