#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Utc};
use cil_tracker::core::start::StartLogic;
use cil_tracker::core::stop::StopLogic;
use cil_tracker::db::pool::DbPool;
use cil_tracker::models::NewSession;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn cil() -> Command {
    cargo_bin_cmd!("cil-tracker")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_cil_tracker.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Fresh, empty output directory inside tempdir
pub fn temp_out_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_cil_out", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create out dir");
    path
}

/// Initialize the DB through the CLI (no config file written)
pub fn init_db(db_path: &str) {
    cil()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

pub fn yesterday() -> NaiveDate {
    Utc::now().date_naive() - TimeDelta::days(1)
}

pub fn yesterday_at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    yesterday().and_hms_opt(h, m, s).expect("valid time")
}

/// Insert a closed session directly through the library, bypassing the clock.
pub fn insert_closed(db_path: &str, start: NaiveDateTime, secs: i64, machine: &str) -> i64 {
    let mut pool = DbPool::open(db_path).expect("open db");
    let new = NewSession::new("Star 1", "Leg 1", machine, None);
    let id = StartLogic::apply_at(&mut pool, &new, start).expect("start");
    StopLogic::apply_at(&mut pool, id, None, start + TimeDelta::seconds(secs)).expect("stop");
    id
}

/// Insert an open session directly through the library.
pub fn insert_open(db_path: &str, start: NaiveDateTime) -> i64 {
    let mut pool = DbPool::open(db_path).expect("open db");
    let new = NewSession::new("Star 2", "Leg 7", "TTM", None);
    StartLogic::apply_at(&mut pool, &new, start).expect("start")
}

pub fn count_sessions(db_path: &str) -> i64 {
    let conn = rusqlite::Connection::open(db_path).expect("open db");
    conn.query_row("SELECT COUNT(*) FROM work_sessions", [], |r| r.get(0))
        .expect("count")
}
