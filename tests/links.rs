mod common;

use common::test_db;
use daybook::database::DatabaseError;

#[test]
fn links_keep_optional_fields() {
    let (db, _dir) = test_db();
    let id = db
        .create_link("Tokio tutorial", "https://tokio.rs/tokio/tutorial", Some("rust"), Some("async basics"))
        .unwrap();
    db.create_link("Bare", "https://example.com", Some(""), None).unwrap();

    let links = db.list_links().unwrap();
    assert_eq!(links.len(), 2);
    // Same day, so the later insert comes first
    assert_eq!(links[0].title, "Bare");
    assert_eq!(links[0].category, None);
    assert_eq!(links[1].id, Some(id));
    assert_eq!(links[1].category.as_deref(), Some("rust"));
    assert_eq!(links[1].comment.as_deref(), Some("async basics"));
    assert_eq!(links[1].saved_at, daybook::utils::today());
}

#[test]
fn url_is_required() {
    let (db, _dir) = test_db();
    let err = db.create_link("No url", "  ", None, None).unwrap_err();
    assert!(matches!(err, DatabaseError::ValidationError(_)));
    assert!(db.list_links().unwrap().is_empty());
}
