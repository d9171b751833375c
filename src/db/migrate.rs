//! Schema versioning for the `work_sessions` table.
//!
//! Every migration has a stable id. Applied ids are recorded in the `log`
//! table (`operation = 'migration_applied'`), so a database always knows
//! which revision of the schema it carries. Column additions backfill
//! existing rows with NULL. Rows of the older single-table deployment
//! (`work_session`) are copied into `work_sessions` once.

use crate::db::queries::parse_ts;
use crate::errors::{AppError, AppResult};
use crate::utils::time::to_storage;
use rusqlite::{Connection, OptionalExtension, Result, params};

type MigrationFn = fn(&Connection) -> Result<()>;

/// Ordered list of schema migrations: (id, description, step).
const MIGRATIONS: &[(&str, &str, MigrationFn)] = &[
    (
        "20240101_0001_create_work_sessions",
        "Created work_sessions table",
        create_work_sessions_table,
    ),
    (
        "20240115_0002_add_operator_name",
        "Added name column to work_sessions",
        add_name_column,
    ),
    (
        "20240115_0003_add_abh_detected",
        "Added abh_detected column to work_sessions",
        add_abh_detected_column,
    ),
    (
        "20240201_0004_import_work_session",
        "Imported rows from the legacy work_session table",
        import_legacy_work_session,
    ),
];

/// Table written by the first deployment of the tracker.
const LEGACY_TABLE: &str = "work_session";

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if a table exists.
fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([table], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Check if `table` has a column named `column`.
fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn create_work_sessions_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS work_sessions (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            line        TEXT NOT NULL,
            leg         TEXT NOT NULL,
            machine     TEXT NOT NULL,
            start_time  TEXT NOT NULL,
            end_time    TEXT,
            duration    INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_work_sessions_start ON work_sessions(start_time);
        "#,
    )?;
    Ok(())
}

fn add_name_column(conn: &Connection) -> Result<()> {
    if table_has_column(conn, "work_sessions", "name")? {
        return Ok(());
    }
    conn.execute("ALTER TABLE work_sessions ADD COLUMN name TEXT", [])?;
    Ok(())
}

fn add_abh_detected_column(conn: &Connection) -> Result<()> {
    if table_has_column(conn, "work_sessions", "abh_detected")? {
        return Ok(());
    }
    conn.execute(
        "ALTER TABLE work_sessions ADD COLUMN abh_detected INTEGER",
        [],
    )?;
    Ok(())
}

/// Copy `work_session` rows into `work_sessions`, keeping their ids unless
/// the id is already taken. Timestamps are rewritten in storage format.
fn import_legacy_work_session(conn: &Connection) -> Result<()> {
    if !table_exists(conn, LEGACY_TABLE)? {
        return Ok(());
    }

    let optional = |column: &'static str| -> Result<&'static str> {
        Ok(if table_has_column(conn, LEGACY_TABLE, column)? {
            column
        } else {
            "NULL"
        })
    };
    let name_col = optional("name")?;
    let abh_col = optional("abh_detected")?;

    let tx = conn.unchecked_transaction()?;
    let mut imported = 0usize;
    {
        let mut select = tx.prepare(&format!(
            "SELECT id, line, leg, machine, start_time, end_time, duration, {name_col}, {abh_col}
             FROM {LEGACY_TABLE} ORDER BY id"
        ))?;
        let mut insert = tx.prepare(
            "INSERT INTO work_sessions
                 (id, line, leg, machine, start_time, end_time, duration, name, abh_detected)
             VALUES (
                 CASE WHEN EXISTS (SELECT 1 FROM work_sessions WHERE id = ?1) THEN NULL ELSE ?1 END,
                 ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9
             )",
        )?;

        let mut rows = select.query([])?;
        while let Some(row) = rows.next()? {
            let start = parse_ts(4, row.get(4)?)?;
            let end = row
                .get::<_, Option<String>>(5)?
                .map(|raw| parse_ts(5, raw))
                .transpose()?;

            insert.execute(params![
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                to_storage(&start),
                end.as_ref().map(to_storage),
                row.get::<_, Option<i64>>(6)?,
                row.get::<_, Option<String>>(7)?,
                row.get::<_, Option<i64>>(8)?,
            ])?;
            imported += 1;
        }
    }
    tx.commit()?;

    tracing::info!(rows = imported, "imported legacy work_session rows");
    Ok(())
}

fn migration_applied(conn: &Connection, id: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([id], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, id: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'), 'migration_applied', ?1, ?2)",
        [id, message],
    )?;
    Ok(())
}

/// Ids of migrations not yet recorded in the `log` table.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut pending = Vec::new();
    for (id, _, _) in MIGRATIONS {
        if !migration_applied(conn, id)? {
            pending.push(*id);
        }
    }
    Ok(pending)
}

/// Zip the database file next to itself before touching a legacy schema.
fn backup_before_migration(db_path: &str) -> AppResult<()> {
    use chrono::Local;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::Path;
    use zip::CompressionMethod;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    let backup_name = format!(
        "{}-backup_db_pre_migration.zip",
        Local::now().format("%Y%m%d_%H%M%S")
    );

    let backup_path = Path::new(db_path)
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(&backup_name);

    let fail = |stage: &str, e: &dyn std::fmt::Display| {
        AppError::Migration(format!("Backup failed ({stage}): {e}"))
    };

    let file = File::create(&backup_path).map_err(|e| fail("create", &e))?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("database.sqlite", options)
        .map_err(|e| fail("start_file", &e))?;

    let db_content = fs::read(db_path).map_err(|e| fail("read", &e))?;
    zip.write_all(&db_content)
        .map_err(|e| fail("write_all", &e))?;
    zip.finish().map_err(|e| fail("finish", &e))?;

    tracing::info!(path = %backup_path.display(), "pre-migration backup created");
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by `DbPool::open` and `db --migrate`.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    let pending = pending_migrations(conn)?;
    if pending.is_empty() {
        return Ok(());
    }

    // An existing table with pending steps is a legacy schema: keep a copy.
    if table_exists(conn, "work_sessions")? || table_exists(conn, LEGACY_TABLE)? {
        tracing::warn!("legacy schema detected, creating safety backup before migration");

        let db_path: String = conn
            .query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(2))
            .unwrap_or_default();

        if db_path.is_empty() {
            tracing::warn!("could not determine database path, backup skipped");
        } else {
            backup_before_migration(&db_path)?;
        }
    }

    for (id, description, step) in MIGRATIONS {
        if !pending.contains(id) {
            continue;
        }

        step(conn).map_err(|e| AppError::Migration(format!("{id}: {e}")))?;
        mark_applied(conn, id, description)?;
        tracing::info!(migration = %id, "migration applied");
    }

    Ok(())
}
