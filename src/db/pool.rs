//! SQLite connection wrapper shared by the CLI commands and the API server.

use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::{Connection, Result};
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        Ok(Self { conn })
    }

    /// Open the database and bring its schema up to date.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = Self::new(path)?;
        pool.conn.busy_timeout(std::time::Duration::from_secs(5))?;
        run_pending_migrations(&pool.conn)?;
        Ok(pool)
    }

    /// Fresh in-memory database with the current schema.
    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        run_pending_migrations(&conn)?;
        Ok(Self { conn })
    }
}
