mod common;

use common::{date, test_db};
use daybook::database::DatabaseError;

#[test]
fn first_conversation_creates_the_person_once() {
    let (db, _dir) = test_db();

    let first = db.record_conversation("Ana", date(2024, 3, 1), "kickoff").unwrap();
    let second = db.record_conversation("Ana", date(2024, 3, 8), "follow-up").unwrap();

    assert!(first.person_created);
    assert!(!second.person_created);
    assert_eq!(first.person_id, second.person_id);
    assert_eq!(db.list_people().unwrap().len(), 1);

    let ana = db.find_person("Ana").unwrap().unwrap();
    assert_eq!(ana.last_interaction, Some(date(2024, 3, 8)));
}

#[test]
fn last_interaction_follows_the_latest_logged_date() {
    let (db, _dir) = test_db();
    db.record_conversation("Bruno", date(2024, 5, 10), "recent").unwrap();
    // Logged afterwards but dated earlier: still overwrites
    db.record_conversation("Bruno", date(2024, 4, 1), "backfilled").unwrap();

    let bruno = db.find_person("Bruno").unwrap().unwrap();
    assert_eq!(bruno.last_interaction, Some(date(2024, 4, 1)));
}

#[test]
fn names_match_exactly() {
    let (db, _dir) = test_db();
    db.record_conversation("Ana", date(2024, 3, 1), "one").unwrap();
    let other = db.record_conversation("ana", date(2024, 3, 2), "two").unwrap();

    assert!(other.person_created);
    assert_eq!(db.list_people().unwrap().len(), 2);
}

#[test]
fn history_is_newest_first_with_names() {
    let (db, _dir) = test_db();
    db.record_conversation("Ana", date(2024, 3, 1), "older").unwrap();
    db.record_conversation("Carla", date(2024, 3, 9), "newer").unwrap();

    let history = db.list_conversations().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].person_name, "Carla");
    assert_eq!(history[0].content, "newer");
    assert_eq!(history[1].person_name, "Ana");
}

#[test]
fn blank_name_or_content_is_rejected_without_creating_anyone() {
    let (db, _dir) = test_db();
    assert!(matches!(
        db.record_conversation("  ", date(2024, 3, 1), "x"),
        Err(DatabaseError::ValidationError(_))
    ));
    assert!(matches!(
        db.record_conversation("Ana", date(2024, 3, 1), ""),
        Err(DatabaseError::ValidationError(_))
    ));
    assert!(db.list_people().unwrap().is_empty());
}
