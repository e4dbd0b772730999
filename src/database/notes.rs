use rusqlite::{Transaction, params};

use super::{Database, DatabaseError, Result, optional, required};
use crate::models::{AssociationKind, AssociationTarget, Note, RelatedEntity};
use crate::utils;

const NOTE_COLUMNS: &str = "id, note_date, content, tag, related_type, related_id";

fn row_to_note(row: &rusqlite::Row) -> Result<Note, rusqlite::Error> {
    let related_type: Option<String> = row.get(4)?;
    Ok(Note {
        id: Some(row.get(0)?),
        note_date: row.get(1)?,
        content: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        tag: row.get(3)?,
        related: RelatedEntity::from_columns(related_type.as_deref(), row.get(5)?),
    })
}

/// Fail unless the row the association points at exists
fn ensure_target_exists(tx: &Transaction<'_>, related: RelatedEntity) -> Result<()> {
    let (Some(kind), Some(id)) = (related.kind(), related.id()) else {
        return Ok(());
    };
    // Table names come from the closed AssociationKind set.
    let exists: bool = tx.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", kind.table()),
        params![id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(DatabaseError::AssociationError(format!(
            "{} {} does not exist",
            kind.to_string().to_lowercase(),
            id
        )));
    }
    Ok(())
}

impl Database {
    /// Save a note dated today. The association target is checked in the same
    /// transaction as the insert.
    pub fn create_note(&self, content: &str, tag: Option<&str>, related: RelatedEntity) -> Result<i64> {
        let content = required("content", content)?;
        let note_date = utils::today();
        let (related_type, related_id) = related.to_columns();

        let id = self.transaction(|tx| {
            ensure_target_exists(tx, related)?;
            tx.execute(
                "INSERT INTO notes (note_date, content, tag, related_type, related_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![note_date, content, optional(tag), related_type, related_id],
            )?;
            Ok(tx.last_insert_rowid())
        })?;

        tracing::info!(note_id = id, related = %related, "note saved");
        Ok(id)
    }

    /// Every note, newest first
    pub fn list_notes(&self) -> Result<Vec<Note>> {
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY note_date DESC, id DESC");
        self.query(&sql, [], row_to_note)
    }

    /// The `limit` newest notes
    pub fn recent_notes(&self, limit: usize) -> Result<Vec<Note>> {
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY note_date DESC, id DESC LIMIT ?1");
        self.query(&sql, params![limit as i64], row_to_note)
    }

    /// Notes attached to a task, conversation or link
    pub fn notes_for(&self, related: RelatedEntity) -> Result<Vec<Note>> {
        let (Some(related_type), Some(related_id)) = related.to_columns() else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT {NOTE_COLUMNS} FROM notes
             WHERE related_type = ?1 AND related_id = ?2
             ORDER BY note_date DESC, id DESC"
        );
        self.query(&sql, params![related_type, related_id], row_to_note)
    }

    /// Rows a note of the given kind can be attached to, newest first
    pub fn association_targets(&self, kind: AssociationKind) -> Result<Vec<AssociationTarget>> {
        let sql = match kind {
            AssociationKind::Task => "SELECT id, title FROM tasks ORDER BY created_at DESC, id DESC",
            AssociationKind::Conversation => {
                "SELECT conversations.id, people.name || ' - ' || conversations.conv_date
                 FROM conversations
                 JOIN people ON people.id = conversations.person_id
                 ORDER BY conversations.conv_date DESC, conversations.id DESC"
            }
            AssociationKind::Link => {
                "SELECT id, title || ' (id ' || id || ')' FROM links ORDER BY saved_at DESC, id DESC"
            }
        };
        self.query(sql, [], |row| {
            Ok(AssociationTarget {
                id: row.get(0)?,
                label: row.get(1)?,
            })
        })
    }
}
