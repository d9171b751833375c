use crate::db::pool::DbPool;
use crate::db::queries::{load_all_sessions, load_session};
use crate::errors::{AppError, AppResult};
use crate::models::WorkSession;

pub struct ListLogic;

impl ListLogic {
    /// Every stored session, most recent start first.
    pub fn all(pool: &mut DbPool) -> AppResult<Vec<WorkSession>> {
        load_all_sessions(&pool.conn)
    }

    pub fn get(pool: &mut DbPool, id: i64) -> AppResult<WorkSession> {
        load_session(&pool.conn, id)?.ok_or(AppError::SessionNotFound(id))
    }
}
