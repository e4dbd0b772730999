#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use daybook::Database;
use rusqlite::Connection;
use tempfile::TempDir;

/// A fresh database in its own temp directory. Keep the TempDir alive for the test.
pub fn test_db() -> (Database, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let db = Database::new(dir.path().join("daybook.db")).expect("open database");
    (db, dir)
}

/// A raw connection, for setting up rows the public API never writes
pub fn raw(db: &Database) -> Connection {
    Connection::open(db.path()).expect("open raw connection")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn days_before(day: NaiveDate, n: u64) -> NaiveDate {
    day.checked_sub_days(Days::new(n)).expect("date in range")
}
