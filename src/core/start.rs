use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::insert_session;
use crate::errors::AppResult;
use crate::models::NewSession;
use crate::utils::time;
use chrono::NaiveDateTime;

/// Opens a new CIL session.
pub struct StartLogic;

impl StartLogic {
    /// Start a session now and return its id.
    ///
    /// No overlap check is made: several sessions may be open on the same
    /// line/leg/machine at once.
    pub fn apply(pool: &mut DbPool, new: &NewSession) -> AppResult<i64> {
        Self::apply_at(pool, new, time::now())
    }

    pub fn apply_at(pool: &mut DbPool, new: &NewSession, now: NaiveDateTime) -> AppResult<i64> {
        let new = new.normalized()?;
        let id = insert_session(&pool.conn, &new, &now)?;

        audit(
            &pool.conn,
            "start",
            &id.to_string(),
            &format!("{} / {} / {}", new.line, new.leg, new.machine),
        );
        tracing::debug!(session_id = id, line = %new.line, leg = %new.leg, "session started");

        Ok(id)
    }
}
