use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use chrono::{TimeDelta, Utc};
use common::{cil, count_sessions, init_db, insert_open, setup_test_db, yesterday_at};

#[test]
fn test_start_stop_show() {
    let db_path = setup_test_db("start_stop_show");
    init_db(&db_path);

    cil()
        .args([
            "--db", &db_path, "start", "--line", "Star 1", "--leg", "Leg 3", "--machine", "HRM",
            "--name", "Priya",
        ])
        .assert()
        .success()
        .stdout(contains("Session 1 started (Star 1 / Leg 3 / HRM)"));

    cil()
        .args(["--db", &db_path, "stop", "1", "--abh", "4"])
        .assert()
        .success()
        .stdout(contains("Session 1 stopped").and(contains("closed")));

    cil()
        .args(["--db", &db_path, "show", "1"])
        .assert()
        .success()
        .stdout(contains("Priya").and(contains("Leg 3")).and(contains("4")));
}

#[test]
fn test_second_stop_is_rejected() {
    let db_path = setup_test_db("second_stop");
    init_db(&db_path);

    cil()
        .args([
            "--db", &db_path, "start", "--line", "Star 6", "--leg", "Leg 2", "--machine", "JTA",
        ])
        .assert()
        .success();

    cil().args(["--db", &db_path, "stop", "1"]).assert().success();

    cil()
        .args(["--db", &db_path, "stop", "1"])
        .assert()
        .failure()
        .stderr(contains("Session 1 is already closed"));
}

#[test]
fn test_stop_unknown_session() {
    let db_path = setup_test_db("stop_unknown");
    init_db(&db_path);

    cil()
        .args(["--db", &db_path, "stop", "99"])
        .assert()
        .failure()
        .stderr(contains("Session not found: 99"));
}

#[test]
fn test_start_outside_catalogue_is_rejected() {
    let db_path = setup_test_db("start_outside_catalogue");
    init_db(&db_path);

    cil()
        .args([
            "--db", &db_path, "start", "--line", "Star 3", "--leg", "Leg 9", "--machine", "HRM",
        ])
        .assert()
        .failure()
        .stderr(contains("Leg 'Leg 9' is not valid for line 'Star 3'"));

    assert_eq!(count_sessions(&db_path), 0);
}

#[test]
fn test_list_shows_open_and_closed() {
    let db_path = setup_test_db("list_open_closed");
    init_db(&db_path);

    cil()
        .args([
            "--db", &db_path, "start", "--line", "Star 5", "--leg", "Leg 4", "--machine", "TTM",
        ])
        .assert()
        .success();
    cil()
        .args([
            "--db", &db_path, "start", "--line", "Star 2", "--leg", "Leg 1", "--machine", "HRM",
        ])
        .assert()
        .success();
    cil().args(["--db", &db_path, "stop", "2"]).assert().success();

    cil()
        .args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(
            contains("Star 5")
                .and(contains("Star 2"))
                .and(contains("open"))
                .and(contains("2 sessions (1 open)")),
        );
}

#[test]
fn test_cleanup_removes_old_sessions() {
    let db_path = setup_test_db("cleanup_old");
    init_db(&db_path);

    let now = Utc::now().naive_utc();
    insert_open(&db_path, now - TimeDelta::days(10));
    insert_open(&db_path, now - TimeDelta::hours(1));

    cil()
        .args(["--db", &db_path, "cleanup", "--days", "7"])
        .assert()
        .success()
        .stdout(contains("Deleted 1 sessions older than 7 days"));

    assert_eq!(count_sessions(&db_path), 1);
}

#[test]
fn test_retention_runs_before_list() {
    let db_path = setup_test_db("retention_hook");
    init_db(&db_path);

    let now = Utc::now().naive_utc();
    insert_open(&db_path, now - TimeDelta::days(400));

    cil()
        .args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("No sessions recorded."));

    assert_eq!(count_sessions(&db_path), 0);
}

#[test]
fn test_lines_prints_catalogue() {
    cil()
        .args(["lines"])
        .assert()
        .success()
        .stdout(contains("Star 6").and(contains("JTA, TFR")));
}

#[test]
fn test_log_records_operations() {
    let db_path = setup_test_db("log_records");
    init_db(&db_path);

    cil()
        .args([
            "--db", &db_path, "start", "--line", "Star 1", "--leg", "Leg 1", "--machine", "HRM",
        ])
        .assert()
        .success();

    cil()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied").and(contains("start")).and(contains("init")));
}

#[test]
fn test_db_info_and_check() {
    let db_path = setup_test_db("db_info_check");
    init_db(&db_path);

    cil()
        .args(["--db", &db_path, "db", "--info", "--check", "--migrate"])
        .assert()
        .success()
        .stdout(
            contains("Schema is up to date")
                .and(contains("Sessions:"))
                .and(contains("Integrity check passed")),
        );
}

#[test]
fn test_migrations_stay_quiet_on_stdout() {
    let db_path = setup_test_db("quiet_migrations");

    cil()
        .args([
            "--db", &db_path, "start", "--line", "Star 1", "--leg", "Leg 1", "--machine", "HRM",
        ])
        .assert()
        .success()
        .stdout(contains("Session 1 started").and(contains("Migration").not()));
}

#[test]
fn test_db_migrate_imports_legacy_work_session() {
    let db_path = setup_test_db("legacy_import");
    let start = yesterday_at(8, 0, 0);
    let end = start + TimeDelta::seconds(3725);
    {
        let conn = rusqlite::Connection::open(&db_path).expect("open db");
        conn.execute_batch(
            "CREATE TABLE work_session (
                id INTEGER NOT NULL PRIMARY KEY,
                line VARCHAR(10) NOT NULL, leg VARCHAR(10) NOT NULL,
                machine VARCHAR(10) NOT NULL,
                start_time DATETIME NOT NULL, end_time DATETIME, duration INTEGER
            );",
        )
        .expect("create legacy table");
        conn.execute(
            "INSERT INTO work_session VALUES (5, 'Star 2', 'Leg 4', 'TTM', ?1, ?2, 3725)",
            [
                start.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
                end.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            ],
        )
        .expect("insert legacy row");
    }

    cil()
        .args(["--db", &db_path, "db", "--migrate"])
        .assert()
        .success()
        .stdout(
            contains("20240201_0004_import_work_session")
                .and(contains("Migration completed"))
                .and(contains("Migration applied").not()),
        );

    assert_eq!(count_sessions(&db_path), 1);

    cil()
        .args(["--db", &db_path, "show", "5"])
        .assert()
        .success()
        .stdout(contains("TTM").and(contains("Leg 4")).and(contains("62:05")));
}
