mod common;

use common::{raw, test_db};
use daybook::database::DatabaseError;
use daybook::{Database, Priority};
use rusqlite::{Connection, ErrorCode};
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[test]
fn unknown_priority_label_is_refused_by_storage() {
    let (db, _dir) = test_db();
    let result = raw(&db).execute(
        "INSERT INTO tasks (title, priority, status, created_at) VALUES ('x', 'Urgent', 'Pendente', '2024-01-01')",
        [],
    );
    assert!(result.is_err());
    assert!(db.list_tasks(None).unwrap().is_empty());
}

#[test]
fn unreadable_stored_label_surfaces_as_storage_error() {
    let (db, _dir) = test_db();
    let conn = raw(&db);
    // Bypass the CHECK by rebuilding the table without it
    conn.execute_batch(
        "DROP TABLE tasks;
         CREATE TABLE tasks (id INTEGER PRIMARY KEY, title TEXT, description TEXT, priority TEXT,
                             status TEXT, created_at TEXT, deadline TEXT);
         INSERT INTO tasks VALUES (1, 'x', NULL, 'Urgent', 'Pendente', '2024-01-01', NULL);",
    )
    .unwrap();

    assert!(matches!(db.list_tasks(None), Err(DatabaseError::SqliteError(_))));
}

#[test]
fn legacy_file_without_deadline_is_migrated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE tasks (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 title TEXT NOT NULL,
                 description TEXT,
                 priority TEXT CHECK(priority IN ('Alta', 'Média', 'Baixa')) NOT NULL DEFAULT 'Média',
                 status TEXT CHECK(status IN ('Pendente', 'Concluído')) NOT NULL DEFAULT 'Pendente',
                 created_at TEXT NOT NULL
             );
             INSERT INTO tasks (title, priority, status, created_at) VALUES ('kept', 'Alta', 'Pendente', '2023-12-01');",
        )
        .unwrap();
    }

    let db = Database::new(&path).unwrap();
    let tasks = db.list_tasks(None).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "kept");
    assert_eq!(tasks[0].priority, Priority::High);
    assert_eq!(tasks[0].deadline, None);

    db.create_task("new", None, Priority::Low, None).unwrap();
    assert_eq!(db.list_tasks(None).unwrap().len(), 2);
}

#[test]
fn reopening_keeps_existing_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/dir/daybook.db");

    let db = Database::new(&path).unwrap();
    db.create_link("Docs", "https://docs.rs", None, None).unwrap();
    drop(db);

    let reopened = Database::new(&path).unwrap();
    assert_eq!(reopened.list_links().unwrap().len(), 1);
}

#[test]
fn write_against_a_held_lock_fails_at_once_and_leaves_nothing() {
    let (db, _dir) = test_db();
    let holder = raw(&db);
    holder.execute_batch("BEGIN IMMEDIATE").unwrap();

    let started = Instant::now();
    let err = db.create_task("Blocked", None, Priority::High, None).unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(1));
    match err {
        DatabaseError::SqliteError(rusqlite::Error::SqliteFailure(e, _)) => {
            assert_eq!(e.code, ErrorCode::DatabaseBusy)
        }
        other => panic!("expected a busy storage error, got {:?}", other),
    }

    holder.execute_batch("ROLLBACK").unwrap();
    assert!(db.list_tasks(None).unwrap().is_empty());
}
