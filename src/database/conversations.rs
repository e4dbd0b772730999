use chrono::NaiveDate;
use rusqlite::{OptionalExtension, params};
use serde::Serialize;

use super::{Database, Result, required};
use crate::models::{Conversation, Person};

/// Outcome of logging a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordedConversation {
    pub conversation_id: i64,
    pub person_id: i64,
    pub person_created: bool,
}

fn row_to_person(row: &rusqlite::Row) -> Result<Person, rusqlite::Error> {
    Ok(Person {
        id: row.get(0)?,
        name: row.get(1)?,
        last_interaction: row.get(2)?,
    })
}

impl Database {
    /// Log a conversation with `name` on `date`.
    ///
    /// The person is looked up by exact name and created when missing. Their
    /// last interaction is then set to `date` unconditionally, even when an
    /// earlier-logged conversation is more recent.
    pub fn record_conversation(&self, name: &str, date: NaiveDate, content: &str) -> Result<RecordedConversation> {
        let name = required("name", name)?;
        let content = required("content", content)?;

        let recorded = self.transaction(|tx| {
            let existing: Option<i64> = tx
                .query_row(
                    "SELECT id FROM people WHERE name = ?1 ORDER BY id LIMIT 1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()?;

            let (person_id, person_created) = match existing {
                Some(id) => (id, false),
                None => {
                    tx.execute(
                        "INSERT INTO people (name, last_interaction) VALUES (?1, ?2)",
                        params![name, date],
                    )?;
                    (tx.last_insert_rowid(), true)
                }
            };

            tx.execute(
                "INSERT INTO conversations (person_id, conv_date, content) VALUES (?1, ?2, ?3)",
                params![person_id, date, content],
            )?;
            let conversation_id = tx.last_insert_rowid();

            tx.execute(
                "UPDATE people SET last_interaction = ?1 WHERE id = ?2",
                params![date, person_id],
            )?;

            Ok(RecordedConversation {
                conversation_id,
                person_id,
                person_created,
            })
        })?;

        tracing::info!(
            conversation_id = recorded.conversation_id,
            person_id = recorded.person_id,
            person_created = recorded.person_created,
            "conversation recorded"
        );
        Ok(recorded)
    }

    /// Conversation history with person names, newest first
    pub fn list_conversations(&self) -> Result<Vec<Conversation>> {
        self.query(
            "SELECT conversations.id, conversations.person_id, people.name,
                    conversations.conv_date, conversations.content
             FROM conversations
             JOIN people ON people.id = conversations.person_id
             ORDER BY conversations.conv_date DESC, conversations.id DESC",
            [],
            |row| {
                Ok(Conversation {
                    id: row.get(0)?,
                    person_id: row.get(1)?,
                    person_name: row.get(2)?,
                    conv_date: row.get(3)?,
                    content: row.get(4)?,
                })
            },
        )
    }

    /// Everyone a conversation was ever logged with, by name
    pub fn list_people(&self) -> Result<Vec<Person>> {
        self.query(
            "SELECT id, name, last_interaction FROM people ORDER BY name COLLATE NOCASE, id",
            [],
            row_to_person,
        )
    }

    pub fn find_person(&self, name: &str) -> Result<Option<Person>> {
        self.query_optional(
            "SELECT id, name, last_interaction FROM people WHERE name = ?1 ORDER BY id LIMIT 1",
            params![name],
            row_to_person,
        )
    }

    /// People last seen strictly before `cutoff`. People with no recorded
    /// interaction are left out on purpose, not through NULL comparison.
    pub fn people_last_seen_before(&self, cutoff: NaiveDate) -> Result<Vec<Person>> {
        self.query(
            "SELECT id, name, last_interaction FROM people
             WHERE last_interaction IS NOT NULL AND last_interaction < ?1
             ORDER BY last_interaction ASC, name",
            params![cutoff],
            row_to_person,
        )
    }
}
