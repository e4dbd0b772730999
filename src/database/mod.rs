//! SQLite storage for the dashboard.
//!
//! Every operation opens its own connection, runs one statement (or one
//! transaction) and drops the connection before returning. Nothing is pooled
//! or cached, so every read sees the latest committed state.

mod conversations;
mod dashboard;
mod links;
mod notes;
mod schema;
mod tasks;

use rusqlite::{Connection, OpenFlags, Params, Row, Transaction};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub use conversations::RecordedConversation;
pub use dashboard::{Dashboard, DashboardSettings};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Invalid association: {0}")]
    AssociationError(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
}

impl DatabaseError {
    /// True for failures raised before any statement ran
    pub fn is_rejected_input(&self) -> bool {
        matches!(self, DatabaseError::ValidationError(_) | DatabaseError::AssociationError(_))
    }
}

pub type Result<T, E = DatabaseError> = std::result::Result<T, E>;

#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    busy_timeout: Duration,
}

impl Database {
    /// Open (or create) the database file and bring the schema up to date
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let db = Database {
            path: db_path,
            busy_timeout: Duration::ZERO,
        };

        let conn = db.connect()?;
        schema::initialize(&conn)?;
        tracing::debug!(path = %db.path.display(), "database schema ready");

        Ok(db)
    }

    /// How long a write waits on a locked database before failing.
    /// Zero means a colliding write fails immediately.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a read-write connection scoped to the caller
    pub(crate) fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        self.prepare_connection(&conn)?;
        Ok(conn)
    }

    fn connect_read_only(&self) -> Result<Connection> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI,
        )?;
        self.prepare_connection(&conn)?;
        Ok(conn)
    }

    fn prepare_connection(&self, conn: &Connection) -> Result<()> {
        conn.busy_timeout(self.busy_timeout)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(())
    }

    /// Run a read-only statement and map every row, in result order
    pub fn query<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.connect_read_only()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?.collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Run a read-only statement expected to return at most one row
    pub fn query_optional<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Option<T>>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.connect_read_only()?;
        match conn.query_row(sql, params, map) {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }

    /// Run one mutating statement and commit it. Returns the number of rows changed.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        self.transaction(|tx| Ok(tx.execute(sql, params)?))
    }

    /// Run `f` inside a transaction. Commits on `Ok`; any error rolls back
    /// when the transaction is dropped, so a failed call leaves no trace.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

/// Trimmed value of a required text field
pub(crate) fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DatabaseError::ValidationError(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Optional text field; blank input is stored as NULL
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank_values() {
        assert_eq!(required("title", "  Report ").ok(), Some("Report".to_string()));
        assert!(matches!(required("title", "   "), Err(DatabaseError::ValidationError(_))));
    }

    #[test]
    fn optional_drops_blank_values() {
        assert_eq!(optional(Some("  ")), None);
        assert_eq!(optional(Some(" work ")), Some("work".to_string()));
        assert_eq!(optional(None), None);
    }
}
