use chrono::NaiveDate;
use rusqlite::params;

use super::{Database, DatabaseError, Result, optional, required};
use crate::models::{Note, Priority, RelatedEntity, Task, TaskStatus};
use crate::utils;

pub(crate) const TASK_COLUMNS: &str = "id, title, description, priority, status, created_at, deadline";

/// SQL expression ranking the stored priority label by `Priority::rank`.
/// Labels come from the closed `Priority` set, never from input.
pub(crate) fn priority_rank_sql() -> String {
    let arms: String = Priority::ALL
        .iter()
        .map(|p| format!(" WHEN '{}' THEN {}", p.label(), p.rank()))
        .collect();
    format!("CASE priority{arms} END")
}

/// Helper function to map a row selected with `TASK_COLUMNS` to a Task
pub(crate) fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    Ok(Task {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        description: row.get(2)?,
        priority: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
        deadline: row.get(6)?,
    })
}

impl Database {
    /// Insert a new pending task created today and return its ID
    pub fn create_task(
        &self,
        title: &str,
        description: Option<&str>,
        priority: Priority,
        deadline: Option<NaiveDate>,
    ) -> Result<i64> {
        let title = required("title", title)?;
        let created_at = utils::today();

        let id = self.transaction(|tx| {
            tx.execute(
                "INSERT INTO tasks (title, description, priority, status, created_at, deadline)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    title,
                    optional(description),
                    priority,
                    TaskStatus::Pending,
                    created_at,
                    deadline
                ],
            )?;
            Ok(tx.last_insert_rowid())
        })?;

        tracing::info!(task_id = id, %priority, "task created");
        Ok(id)
    }

    /// All tasks, optionally filtered by status.
    ///
    /// Tasks with a deadline come first in ascending deadline order, tasks
    /// without one follow. Ties are broken by priority severity, then id.
    pub fn list_tasks(&self, status: Option<TaskStatus>) -> Result<Vec<Task>> {
        let rank = priority_rank_sql();
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE (?1 IS NULL OR status = ?1)
             ORDER BY deadline IS NULL, deadline ASC, {rank}, id"
        );
        self.query(&sql, params![status], row_to_task)
    }

    /// Get a single task by ID
    pub fn get_task(&self, id: i64) -> Result<Task> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
        self.query_optional(&sql, params![id], row_to_task)?
            .ok_or(DatabaseError::NotFound { entity: "task", id })
    }

    /// Set a task's status to Done. Re-applying to a finished task changes nothing.
    pub fn mark_task_done(&self, id: i64) -> Result<()> {
        let changed = self.execute(
            "UPDATE tasks SET status = ?1 WHERE id = ?2",
            params![TaskStatus::Done, id],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound { entity: "task", id });
        }
        tracing::info!(task_id = id, "task marked done");
        Ok(())
    }

    /// Update title, description, priority, status and deadline in one statement
    pub fn update_task(&self, task: &Task) -> Result<()> {
        let id = task
            .id
            .ok_or_else(|| DatabaseError::ValidationError("task has no id".to_string()))?;
        let title = required("title", &task.title)?;

        let changed = self.execute(
            "UPDATE tasks SET title = ?1, description = ?2, priority = ?3, status = ?4, deadline = ?5
             WHERE id = ?6",
            params![
                title,
                optional(task.description.as_deref()),
                task.priority,
                task.status,
                task.deadline,
                id
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound { entity: "task", id });
        }
        tracing::info!(task_id = id, "task updated");
        Ok(())
    }

    /// Notes attached to the given task
    pub fn task_notes(&self, task_id: i64) -> Result<Vec<Note>> {
        self.notes_for(RelatedEntity::Task(task_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_expression_covers_every_priority() {
        assert_eq!(
            priority_rank_sql(),
            "CASE priority WHEN 'Alta' THEN 1 WHEN 'Média' THEN 2 WHEN 'Baixa' THEN 3 END"
        );
    }
}
