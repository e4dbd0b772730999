use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Task priority. Stored with the Portuguese labels existing database files use
/// (`Alta`, `Média`, `Baixa`), which the `tasks.priority` CHECK constraint enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Label persisted in the database
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "Alta",
            Priority::Medium => "Média",
            Priority::Low => "Baixa",
        }
    }

    /// Severity rank, lower is more urgent
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(name)
    }
}

impl FromStr for Priority {
    type Err = String;

    /// Accepts the English names (any case) or the stored labels
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(p) = Self::from_label(s) {
            return Ok(p);
        }
        match s.to_lowercase().as_str() {
            "high" | "h" | "alta" => Ok(Priority::High),
            "medium" | "m" | "média" | "media" => Ok(Priority::Medium),
            "low" | "l" | "baixa" => Ok(Priority::Low),
            _ => Err(format!("unknown priority '{}' (expected high, medium or low)", s)),
        }
    }
}

impl ToSql for Priority {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.label()))
    }
}

impl FromSql for Priority {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let label = value.as_str()?;
        Self::from_label(label)
            .ok_or_else(|| FromSqlError::Other(format!("invalid priority label '{}'", label).into()))
    }
}

/// Task status. Stored as `Pendente` / `Concluído`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 2] = [TaskStatus::Pending, TaskStatus::Done];

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pendente",
            TaskStatus::Done => "Concluído",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Done => "Done",
        })
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(status) = Self::from_label(s) {
            return Ok(status);
        }
        match s.to_lowercase().as_str() {
            "pending" | "todo" | "pendente" => Ok(TaskStatus::Pending),
            "done" | "completed" | "concluído" | "concluido" => Ok(TaskStatus::Done),
            _ => Err(format!("unknown status '{}' (expected pending or done)", s)),
        }
    }
}

impl ToSql for TaskStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.label()))
    }
}

impl FromSql for TaskStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let label = value.as_str()?;
        Self::from_label(label)
            .ok_or_else(|| FromSqlError::Other(format!("invalid status label '{}'", label).into()))
    }
}

/// Kind of row a note can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssociationKind {
    Task,
    Conversation,
    Link,
}

impl AssociationKind {
    /// Value stored in `notes.related_type`
    pub fn label(self) -> &'static str {
        match self {
            AssociationKind::Task => "Tarefa",
            AssociationKind::Conversation => "Conversa",
            AssociationKind::Link => "Link",
        }
    }

    /// Table the related id points into
    pub fn table(self) -> &'static str {
        match self {
            AssociationKind::Task => "tasks",
            AssociationKind::Conversation => "conversations",
            AssociationKind::Link => "links",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        [AssociationKind::Task, AssociationKind::Conversation, AssociationKind::Link]
            .into_iter()
            .find(|k| k.label() == label)
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssociationKind::Task => "Task",
            AssociationKind::Conversation => "Conversation",
            AssociationKind::Link => "Link",
        })
    }
}

impl FromStr for AssociationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(kind) = Self::from_label(s) {
            return Ok(kind);
        }
        match s.to_lowercase().as_str() {
            "task" | "tarefa" => Ok(AssociationKind::Task),
            "conversation" | "conversa" | "1:1" => Ok(AssociationKind::Conversation),
            "link" => Ok(AssociationKind::Link),
            _ => Err(format!("unknown association kind '{}' (expected task, conversation or link)", s)),
        }
    }
}

/// What a note is attached to. Replaces the loose `(related_type, related_id)`
/// column pair; the target is checked against its table when the note is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum RelatedEntity {
    #[default]
    None,
    Task(i64),
    Conversation(i64),
    Link(i64),
}

impl RelatedEntity {
    pub fn new(kind: AssociationKind, id: i64) -> Self {
        match kind {
            AssociationKind::Task => RelatedEntity::Task(id),
            AssociationKind::Conversation => RelatedEntity::Conversation(id),
            AssociationKind::Link => RelatedEntity::Link(id),
        }
    }

    pub fn kind(&self) -> Option<AssociationKind> {
        match self {
            RelatedEntity::None => None,
            RelatedEntity::Task(_) => Some(AssociationKind::Task),
            RelatedEntity::Conversation(_) => Some(AssociationKind::Conversation),
            RelatedEntity::Link(_) => Some(AssociationKind::Link),
        }
    }

    pub fn id(&self) -> Option<i64> {
        match *self {
            RelatedEntity::None => None,
            RelatedEntity::Task(id) | RelatedEntity::Conversation(id) | RelatedEntity::Link(id) => Some(id),
        }
    }

    /// Split into the `(related_type, related_id)` columns
    pub fn to_columns(&self) -> (Option<&'static str>, Option<i64>) {
        (self.kind().map(AssociationKind::label), self.id())
    }

    /// Rebuild from the stored columns. A type without an id (or an id without
    /// a recognised type) reads as no association.
    pub fn from_columns(related_type: Option<&str>, related_id: Option<i64>) -> Self {
        match (related_type.and_then(AssociationKind::from_label), related_id) {
            (Some(kind), Some(id)) => RelatedEntity::new(kind, id),
            _ => RelatedEntity::None,
        }
    }
}

impl fmt::Display for RelatedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind(), self.id()) {
            (Some(kind), Some(id)) => write!(f, "{} #{}", kind, id),
            _ => f.write_str("-"),
        }
    }
}

/// An association as picked in a form: a kind plus a target that may not
/// have been chosen yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssociationChoice {
    pub kind: Option<AssociationKind>,
    pub target: Option<i64>,
}

impl AssociationChoice {
    pub fn none() -> Self {
        Self::default()
    }

    /// A save is allowed only when no kind is chosen, or a kind and a target are.
    pub fn resolve(self) -> Result<RelatedEntity, crate::database::DatabaseError> {
        match (self.kind, self.target) {
            (None, _) => Ok(RelatedEntity::None),
            (Some(kind), Some(id)) => Ok(RelatedEntity::new(kind, id)),
            (Some(kind), None) => Err(crate::database::DatabaseError::AssociationError(format!(
                "association type {} selected but no {} was chosen",
                kind,
                kind.to_string().to_lowercase()
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub created_at: NaiveDate,
    pub deadline: Option<NaiveDate>,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Option<i64>,
    /// Always set for notes written here; older files may hold NULL
    pub note_date: Option<NaiveDate>,
    pub content: String,
    pub tag: Option<String>,
    pub related: RelatedEntity,
}

impl Note {
    /// The note date, or "undated" when the row has none
    pub fn date_label(&self) -> String {
        self.note_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "undated".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub last_interaction: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub person_id: i64,
    pub person_name: String,
    pub conv_date: NaiveDate,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: Option<i64>,
    pub title: String,
    pub category: Option<String>,
    pub url: String,
    pub comment: Option<String>,
    pub saved_at: NaiveDate,
}

/// A row that a note can be attached to, as offered in a picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationTarget {
    pub id: i64,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parses_english_and_stored_labels() {
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("Média".parse::<Priority>(), Ok(Priority::Medium));
        assert_eq!(" LOW ".parse::<Priority>(), Ok(Priority::Low));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn severity_rank_is_high_medium_low() {
        let mut all = vec![Priority::Low, Priority::High, Priority::Medium];
        all.sort_by_key(|p| p.rank());
        assert_eq!(all, vec![Priority::High, Priority::Medium, Priority::Low]);
    }

    #[test]
    fn status_labels_round_trip_through_from_label() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::from_label(status.label()), Some(status));
        }
        assert_eq!("done".parse::<TaskStatus>(), Ok(TaskStatus::Done));
    }

    #[test]
    fn related_entity_columns() {
        assert_eq!(RelatedEntity::Task(7).to_columns(), (Some("Tarefa"), Some(7)));
        assert_eq!(RelatedEntity::None.to_columns(), (None, None));
        assert_eq!(RelatedEntity::from_columns(Some("Conversa"), Some(3)), RelatedEntity::Conversation(3));
        assert_eq!(RelatedEntity::from_columns(Some("Link"), None), RelatedEntity::None);
        assert_eq!(RelatedEntity::from_columns(Some("Nenhum"), Some(1)), RelatedEntity::None);
    }

    #[test]
    fn association_choice_requires_target_for_kind() {
        assert_eq!(AssociationChoice::none().resolve().ok(), Some(RelatedEntity::None));

        let picked = AssociationChoice { kind: Some(AssociationKind::Link), target: Some(4) };
        assert_eq!(picked.resolve().ok(), Some(RelatedEntity::Link(4)));

        let missing = AssociationChoice { kind: Some(AssociationKind::Task), target: None };
        assert!(matches!(
            missing.resolve(),
            Err(crate::database::DatabaseError::AssociationError(_))
        ));
    }

    #[test]
    fn task_serializes_dates_as_iso_strings() {
        let task = Task {
            id: Some(1),
            title: "Write report".to_string(),
            description: None,
            priority: Priority::High,
            status: TaskStatus::Pending,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            deadline: NaiveDate::from_ymd_opt(2024, 1, 10),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["created_at"], "2024-01-02");
        assert_eq!(json["deadline"], "2024-01-10");
        assert_eq!(serde_json::from_value::<Task>(json).unwrap(), task);
    }

    #[test]
    fn undated_note_has_a_label() {
        let mut note = Note {
            id: Some(1),
            note_date: None,
            content: "legacy".to_string(),
            tag: None,
            related: RelatedEntity::None,
        };
        assert_eq!(note.date_label(), "undated");
        note.note_date = NaiveDate::from_ymd_opt(2024, 3, 4);
        assert_eq!(note.date_label(), "2024-03-04");
        assert_eq!(serde_json::to_value(&note).unwrap()["note_date"], "2024-03-04");
    }
}
