use rusqlite::Connection;

use super::Result;

/// Tables are created only when missing so files written by older versions
/// open unchanged. The CHECK constraints on `tasks` pin the stored labels of
/// `Priority` and `TaskStatus`.
const TABLES: &str = "
CREATE TABLE IF NOT EXISTS notes (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    note_date       TEXT,
    content         TEXT,
    tag             TEXT,
    related_type    TEXT,
    related_id      INTEGER
);

CREATE TABLE IF NOT EXISTS people (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    name                TEXT NOT NULL,
    last_interaction    TEXT
);

CREATE TABLE IF NOT EXISTS conversations (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id   INTEGER NOT NULL,
    conv_date   TEXT NOT NULL,
    content     TEXT NOT NULL,
    FOREIGN KEY (person_id) REFERENCES people (id)
);

CREATE TABLE IF NOT EXISTS tasks (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    description TEXT,
    priority    TEXT CHECK(priority IN ('Alta', 'Média', 'Baixa')) NOT NULL DEFAULT 'Média',
    status      TEXT CHECK(status IN ('Pendente', 'Concluído')) NOT NULL DEFAULT 'Pendente',
    created_at  TEXT NOT NULL,
    deadline    TEXT
);

CREATE TABLE IF NOT EXISTS links (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    category    TEXT,
    url         TEXT NOT NULL,
    comment     TEXT,
    saved_at    TEXT NOT NULL
);
";

const INDEXES: &str = "
CREATE INDEX IF NOT EXISTS idx_notes_note_date ON notes(note_date);
CREATE INDEX IF NOT EXISTS idx_notes_related ON notes(related_type, related_id);
CREATE INDEX IF NOT EXISTS idx_people_name ON people(name);
CREATE INDEX IF NOT EXISTS idx_conversations_person_id ON conversations(person_id);
CREATE INDEX IF NOT EXISTS idx_conversations_conv_date ON conversations(conv_date);
CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);
CREATE INDEX IF NOT EXISTS idx_links_saved_at ON links(saved_at);
";

/// Create missing tables, apply additive migrations, then build indexes
pub(crate) fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch(TABLES)?;
    migrate(conn)?;
    conn.execute_batch(INDEXES)?;
    Ok(())
}

/// Additive migrations. Each one is a no-op when the column already exists.
fn migrate(conn: &Connection) -> Result<()> {
    if add_column_if_missing(conn, "tasks", "deadline", "TEXT")? {
        tracing::info!("migrated tasks table: added deadline column");
    }
    conn.execute_batch("CREATE INDEX IF NOT EXISTS idx_tasks_deadline ON tasks(deadline)")?;
    Ok(())
}

pub(crate) fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2")?;
    let count: i64 = stmt.query_row(rusqlite::params![table, column], |row| row.get(0))?;
    Ok(count > 0)
}

/// Returns whether the column was added
pub(crate) fn add_column_if_missing(
    conn: &Connection,
    table: &str,
    column: &str,
    declaration: &str,
) -> Result<bool> {
    if column_exists(conn, table, column)? {
        return Ok(false);
    }
    // Identifiers cannot be bound; callers only pass fixed names.
    conn.execute(
        &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, declaration),
        [],
    )?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_is_repeatable() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        initialize(&conn).unwrap();
        assert!(column_exists(&conn, "tasks", "deadline").unwrap());
    }

    #[test]
    fn adds_deadline_to_legacy_tasks_table() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                priority TEXT NOT NULL DEFAULT 'Média',
                status TEXT NOT NULL DEFAULT 'Pendente',
                created_at TEXT NOT NULL
            );
            INSERT INTO tasks (title, created_at) VALUES ('legacy', '2023-05-01');",
        )
        .unwrap();
        assert!(!column_exists(&conn, "tasks", "deadline").unwrap());

        initialize(&conn).unwrap();

        assert!(column_exists(&conn, "tasks", "deadline").unwrap());
        let deadline: Option<String> = conn
            .query_row("SELECT deadline FROM tasks WHERE title = 'legacy'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(deadline, None);
    }

    #[test]
    fn adding_existing_column_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        assert!(!add_column_if_missing(&conn, "tasks", "deadline", "TEXT").unwrap());
    }
}
