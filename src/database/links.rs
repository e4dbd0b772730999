use rusqlite::params;

use super::{Database, Result, optional, required};
use crate::models::Link;
use crate::utils;

impl Database {
    /// Save a link dated today and return its ID
    pub fn create_link(
        &self,
        title: &str,
        url: &str,
        category: Option<&str>,
        comment: Option<&str>,
    ) -> Result<i64> {
        let title = required("title", title)?;
        let url = required("url", url)?;
        let saved_at = utils::today();

        let id = self.transaction(|tx| {
            tx.execute(
                "INSERT INTO links (title, category, url, comment, saved_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![title, optional(category), url, optional(comment), saved_at],
            )?;
            Ok(tx.last_insert_rowid())
        })?;

        tracing::info!(link_id = id, "link saved");
        Ok(id)
    }

    /// All links, most recently saved first
    pub fn list_links(&self) -> Result<Vec<Link>> {
        self.query(
            "SELECT id, title, category, url, comment, saved_at FROM links ORDER BY saved_at DESC, id DESC",
            [],
            |row| {
                Ok(Link {
                    id: Some(row.get(0)?),
                    title: row.get(1)?,
                    category: row.get(2)?,
                    url: row.get(3)?,
                    comment: row.get(4)?,
                    saved_at: row.get(5)?,
                })
            },
        )
    }
}
