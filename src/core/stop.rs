use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::{close_session, load_session};
use crate::errors::{AppError, AppResult};
use crate::models::WorkSession;
use crate::utils::time::{self, duration_seconds};
use chrono::NaiveDateTime;

/// Closes an open CIL session and derives its duration.
pub struct StopLogic;

impl StopLogic {
    pub fn apply(pool: &mut DbPool, id: i64, abh_detected: Option<i64>) -> AppResult<WorkSession> {
        Self::apply_at(pool, id, abh_detected, time::now())
    }

    /// Stop session `id` at `now`.
    ///
    /// - unknown id → `SessionNotFound`
    /// - already stopped → `AlreadyClosed`; the stored record is left as is
    pub fn apply_at(
        pool: &mut DbPool,
        id: i64,
        abh_detected: Option<i64>,
        now: NaiveDateTime,
    ) -> AppResult<WorkSession> {
        if let Some(n) = abh_detected
            && n < 0
        {
            return Err(AppError::InvalidInput(format!(
                "abh_detected must not be negative (got {n})"
            )));
        }

        let session = load_session(&pool.conn, id)?.ok_or(AppError::SessionNotFound(id))?;
        if !session.is_open() {
            return Err(AppError::AlreadyClosed(id));
        }

        let duration = duration_seconds(&session.start_time, &now);

        if !close_session(&pool.conn, id, &now, duration, abh_detected)? {
            // Lost a race with another stop (or the sweep removed the row).
            return match load_session(&pool.conn, id)? {
                Some(_) => Err(AppError::AlreadyClosed(id)),
                None => Err(AppError::SessionNotFound(id)),
            };
        }

        audit(
            &pool.conn,
            "stop",
            &id.to_string(),
            &format!("duration {duration}s"),
        );
        tracing::debug!(session_id = id, duration, "session stopped");

        load_session(&pool.conn, id)?.ok_or(AppError::SessionNotFound(id))
    }
}
