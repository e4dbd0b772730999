mod common;

use common::{date, test_db};
use daybook::database::DatabaseError;
use daybook::{Priority, TaskStatus};

#[test]
fn deadline_tasks_come_before_open_ended_ones() {
    let (db, _dir) = test_db();
    db.create_task("Clean desk", None, Priority::Low, None).unwrap();
    db.create_task("Write report", None, Priority::High, Some(date(2024, 1, 10))).unwrap();

    let titles: Vec<String> = db.list_tasks(None).unwrap().into_iter().map(|t| t.title).collect();
    assert_eq!(titles, ["Write report", "Clean desk"]);
}

#[test]
fn equal_deadlines_break_ties_by_severity() {
    let (db, _dir) = test_db();
    let deadline = Some(date(2024, 3, 1));
    db.create_task("low", None, Priority::Low, deadline).unwrap();
    db.create_task("medium", None, Priority::Medium, deadline).unwrap();
    db.create_task("high", None, Priority::High, deadline).unwrap();
    db.create_task("earlier", None, Priority::Low, Some(date(2024, 2, 1))).unwrap();

    let titles: Vec<String> = db.list_tasks(None).unwrap().into_iter().map(|t| t.title).collect();
    assert_eq!(titles, ["earlier", "high", "medium", "low"]);
}

#[test]
fn new_tasks_are_pending_and_dated_today() {
    let (db, _dir) = test_db();
    let id = db
        .create_task("  Plan sprint  ", Some("  "), Priority::Medium, None)
        .unwrap();

    let task = db.get_task(id).unwrap();
    assert_eq!(task.title, "Plan sprint");
    assert_eq!(task.description, None);
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.created_at, daybook::utils::today());
}

#[test]
fn marking_done_is_idempotent() {
    let (db, _dir) = test_db();
    let id = db.create_task("Review PR", None, Priority::High, None).unwrap();

    db.mark_task_done(id).unwrap();
    db.mark_task_done(id).unwrap();

    assert!(db.get_task(id).unwrap().is_done());
    assert!(db.list_tasks(Some(TaskStatus::Pending)).unwrap().is_empty());
    assert_eq!(db.list_tasks(Some(TaskStatus::Done)).unwrap().len(), 1);
}

#[test]
fn missing_task_is_not_found() {
    let (db, _dir) = test_db();
    assert!(matches!(
        db.mark_task_done(42),
        Err(DatabaseError::NotFound { entity: "task", id: 42 })
    ));
    assert!(matches!(db.get_task(42), Err(DatabaseError::NotFound { .. })));
}

#[test]
fn blank_title_is_rejected_without_writing() {
    let (db, _dir) = test_db();
    let err = db.create_task("   ", None, Priority::Low, None).unwrap_err();
    assert!(matches!(err, DatabaseError::ValidationError(_)));
    assert!(err.is_rejected_input());
    assert!(db.list_tasks(None).unwrap().is_empty());
}

#[test]
fn update_rewrites_every_field() {
    let (db, _dir) = test_db();
    let id = db.create_task("Draft", None, Priority::Low, None).unwrap();

    let mut task = db.get_task(id).unwrap();
    task.title = "Final".to_string();
    task.description = Some("ship it".to_string());
    task.priority = Priority::High;
    task.status = TaskStatus::Done;
    task.deadline = Some(date(2024, 5, 5));
    db.update_task(&task).unwrap();

    assert_eq!(db.get_task(id).unwrap(), task);
}
