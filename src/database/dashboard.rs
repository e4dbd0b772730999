use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::tasks::{TASK_COLUMNS, priority_rank_sql, row_to_task};
use super::{Database, Result};
use crate::models::{Note, Person, Task, TaskStatus};

/// Thresholds for the daily overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSettings {
    pub stale_contact_days: u32,
    pub recent_notes_limit: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            stale_contact_days: 14,
            recent_notes_limit: 5,
        }
    }
}

/// The daily overview: what is pending, what was written lately and who
/// has not had a 1:1 in a while.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub pending_tasks: Vec<Task>,
    pub recent_notes: Vec<Note>,
    pub stale_people: Vec<Person>,
}

impl Dashboard {
    pub fn load(db: &Database, today: NaiveDate, settings: DashboardSettings) -> Result<Self> {
        Ok(Self {
            today,
            pending_tasks: db.pending_tasks_by_severity()?,
            recent_notes: db.recent_notes(settings.recent_notes_limit)?,
            stale_people: db.stale_people(today, settings.stale_contact_days)?,
        })
    }
}

impl Database {
    /// Pending tasks, most severe first
    pub fn pending_tasks_by_severity(&self) -> Result<Vec<Task>> {
        let rank = priority_rank_sql();
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE status = ?1
             ORDER BY {rank}, deadline IS NULL, deadline ASC, id"
        );
        self.query(&sql, rusqlite::params![TaskStatus::Pending], row_to_task)
    }

    /// People whose last interaction is strictly older than `threshold_days`
    /// before `today`
    pub fn stale_people(&self, today: NaiveDate, threshold_days: u32) -> Result<Vec<Person>> {
        let cutoff = today
            .checked_sub_days(Days::new(u64::from(threshold_days)))
            .unwrap_or(NaiveDate::MIN);
        self.people_last_seen_before(cutoff)
    }
}
