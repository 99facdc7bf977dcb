use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::debug;

use crate::database::{normalize_tag, Catalog};
use crate::error::{require_name, CatalogError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

fn tag_id(conn: &Connection, name: &str) -> rusqlite::Result<Option<i64>> {
    conn.query_row("SELECT id FROM tags WHERE name = ?1", params![name], |row| row.get(0))
        .optional()
}

impl Catalog {
    pub fn add_tag(&mut self, name: &str) -> Result<()> {
        let name = normalize_tag(require_name("tag", name)?);
        let inserted = self.write(|conn| {
            Ok(conn.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1)", params![name])?)
        })?;
        if inserted > 0 {
            debug!("Added tag {:?}", name);
        }
        Ok(())
    }

    /// Removes the tag and every asset link to it. Unknown names are a no-op.
    pub fn delete_tag(&mut self, name: &str) -> Result<()> {
        let name = normalize_tag(name);
        self.write(|conn| {
            conn.execute("DELETE FROM tags WHERE name = ?1", params![name])?;
            Ok(())
        })
    }

    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM tags ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(Tag {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Tags an asset with an existing tag. The tag must have been created with `add_tag`.
    pub fn tag_asset(&mut self, asset_id: i64, tag_name: &str) -> Result<()> {
        let name = normalize_tag(tag_name);
        self.write(|conn| {
            let tag = tag_id(conn, &name)?.ok_or_else(|| CatalogError::TagNotFound(name.clone()))?;
            let linked = conn.execute(
                "INSERT OR IGNORE INTO asset_tags (asset_id, tag_id) VALUES (?1, ?2)",
                params![asset_id, tag],
            )?;
            if linked > 0 {
                debug!("Tagged asset {} with {:?}", asset_id, name);
            }
            Ok(())
        })
    }

    /// Removes a tag from an asset. An unknown tag name is silently ignored.
    pub fn untag_asset(&mut self, asset_id: i64, tag_name: &str) -> Result<()> {
        let name = normalize_tag(tag_name);
        self.write(|conn| {
            let Some(tag) = tag_id(conn, &name)? else {
                return Ok(());
            };
            conn.execute(
                "DELETE FROM asset_tags WHERE asset_id = ?1 AND tag_id = ?2",
                params![asset_id, tag],
            )?;
            Ok(())
        })
    }

    pub fn tags_of(&self, asset_id: i64) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT tags.name FROM asset_tags
             JOIN tags ON asset_tags.tag_id = tags.id
             WHERE asset_tags.asset_id = ?1
             ORDER BY tags.name",
        )?;
        let rows = stmt.query_map(params![asset_id], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
