use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::delete_started_before;
use crate::errors::{AppError, AppResult};
use crate::utils::time::{self, format_display};
use chrono::{NaiveDateTime, TimeDelta};

/// Retention sweep: purges sessions older than the retention window.
pub struct CleanupLogic;

impl CleanupLogic {
    pub fn sweep(pool: &mut DbPool, retention_days: i64) -> AppResult<usize> {
        Self::sweep_at(pool, retention_days, time::now())
    }

    /// Delete every session, open or closed, whose start is strictly before
    /// `now - retention_days`. Returns the number of deleted rows.
    pub fn sweep_at(
        pool: &mut DbPool,
        retention_days: i64,
        now: NaiveDateTime,
    ) -> AppResult<usize> {
        if retention_days < 0 {
            return Err(AppError::InvalidInput(format!(
                "retention_days must not be negative (got {retention_days})"
            )));
        }

        let cutoff = TimeDelta::try_days(retention_days)
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| {
                AppError::InvalidInput(format!("retention_days out of range: {retention_days}"))
            })?;

        let deleted = delete_started_before(&pool.conn, &cutoff)?;

        if deleted > 0 {
            audit(
                &pool.conn,
                "cleanup",
                &format!("{retention_days}d"),
                &format!(
                    "Deleted {deleted} sessions started before {}",
                    format_display(&cutoff)
                ),
            );
            tracing::info!(deleted, retention_days, "retention sweep removed sessions");
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::start::StartLogic;
    use crate::core::stop::StopLogic;
    use crate::db::queries::load_all_sessions;
    use crate::models::NewSession;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn start(pool: &mut DbPool, at: NaiveDateTime) -> i64 {
        StartLogic::apply_at(pool, &NewSession::new("Star 1", "Leg 1", "HRM", None), at).unwrap()
    }

    #[test]
    fn removes_old_sessions_regardless_of_state() {
        let mut pool = DbPool::in_memory().unwrap();

        let old_open = start(&mut pool, day(1));
        let old_closed = start(&mut pool, day(2));
        StopLogic::apply_at(&mut pool, old_closed, None, day(3)).unwrap();
        let recent = start(&mut pool, day(20));

        let deleted = CleanupLogic::sweep_at(&mut pool, 10, day(25)).unwrap();
        assert_eq!(deleted, 2);

        let ids: Vec<i64> = load_all_sessions(&pool.conn)
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![recent]);
        assert!(!ids.contains(&old_open));
    }

    #[test]
    fn cutoff_is_strict() {
        let mut pool = DbPool::in_memory().unwrap();
        let exactly_at_cutoff = start(&mut pool, day(1));

        // now - 10 days == day(1): not strictly older, so it survives.
        let deleted = CleanupLogic::sweep_at(&mut pool, 10, day(11)).unwrap();
        assert_eq!(deleted, 0);
        assert_eq!(load_all_sessions(&pool.conn).unwrap()[0].id, exactly_at_cutoff);
    }

    #[test]
    fn nothing_to_delete_writes_no_audit_line() {
        let mut pool = DbPool::in_memory().unwrap();
        CleanupLogic::sweep(&mut pool, 30).unwrap();

        let lines: i64 = pool
            .conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'cleanup'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(lines, 0);
    }

    #[test]
    fn negative_window_is_rejected() {
        let mut pool = DbPool::in_memory().unwrap();
        assert!(CleanupLogic::sweep(&mut pool, -1).is_err());
    }
}
