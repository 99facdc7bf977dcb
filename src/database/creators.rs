use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;
use tracing::debug;

use crate::database::Catalog;
use crate::error::{require_name, Result};

pub const DEFAULT_ROLE: &str = "Author";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Creator {
    pub id: i64,
    pub display_name: String,
    pub notes: Option<String>,
}

impl Creator {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            display_name: row.get(1)?,
            notes: row.get(2)?,
        })
    }
}

/// A creator as attached to one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatorLink {
    pub creator: Creator,
    pub role: String,
}

impl Catalog {
    /// Adds a creator unless one with the same (trimmed) display name exists.
    pub fn add_creator(&mut self, display_name: &str, notes: Option<&str>) -> Result<()> {
        let display_name = require_name("display_name", display_name)?;
        let inserted = self.write(|conn| {
            let existing: Option<i64> = conn
                .query_row(
                    "SELECT id FROM creators WHERE display_name = ?1 LIMIT 1",
                    params![display_name],
                    |row| row.get(0),
                )
                .optional()?;
            if existing.is_some() {
                return Ok(false);
            }
            conn.execute(
                "INSERT INTO creators (display_name, notes) VALUES (?1, ?2)",
                params![display_name, notes],
            )?;
            Ok(true)
        })?;
        if inserted {
            debug!("Added creator {:?}", display_name);
        }
        Ok(())
    }

    pub fn delete_creator(&mut self, id: i64) -> Result<()> {
        let removed = self.write(|conn| Ok(conn.execute("DELETE FROM creators WHERE id = ?1", params![id])?))?;
        if removed > 0 {
            debug!("Deleted creator {}", id);
        }
        Ok(())
    }

    /// Updates only the supplied fields. An unknown id changes nothing.
    pub fn edit_creator(&mut self, id: i64, display_name: Option<&str>, notes: Option<&str>) -> Result<()> {
        let display_name = display_name
            .map(|name| require_name("display_name", name))
            .transpose()?;
        self.write(|conn| {
            if let Some(name) = display_name {
                conn.execute(
                    "UPDATE creators SET display_name = ?1 WHERE id = ?2",
                    params![name, id],
                )?;
            }
            if let Some(notes) = notes {
                conn.execute("UPDATE creators SET notes = ?1 WHERE id = ?2", params![notes, id])?;
            }
            Ok(())
        })
    }

    pub fn get_creator(&self, id: i64) -> Result<Option<Creator>> {
        let creator = self
            .conn
            .query_row(
                "SELECT id, display_name, notes FROM creators WHERE id = ?1",
                params![id],
                Creator::from_row,
            )
            .optional()?;
        Ok(creator)
    }

    pub fn list_creators(&self) -> Result<Vec<Creator>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, display_name, notes FROM creators ORDER BY display_name, id")?;
        let rows = stmt.query_map([], Creator::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Links a creator to an asset; both must exist. An existing link keeps its role.
    pub fn link_creator(&mut self, asset_id: i64, creator_id: i64, role: Option<&str>) -> Result<()> {
        let role = role.unwrap_or(DEFAULT_ROLE);
        let linked = self.write(|conn| {
            Ok(conn.execute(
                "INSERT OR IGNORE INTO asset_creators (asset_id, creator_id, role) VALUES (?1, ?2, ?3)",
                params![asset_id, creator_id, role],
            )?)
        })?;
        if linked > 0 {
            debug!("Linked creator {} to asset {} as {:?}", creator_id, asset_id, role);
        }
        Ok(())
    }

    pub fn unlink_creator(&mut self, asset_id: i64, creator_id: i64) -> Result<()> {
        self.write(|conn| {
            conn.execute(
                "DELETE FROM asset_creators WHERE asset_id = ?1 AND creator_id = ?2",
                params![asset_id, creator_id],
            )?;
            Ok(())
        })
    }

    pub fn creators_of(&self, asset_id: i64) -> Result<Vec<CreatorLink>> {
        let mut stmt = self.conn.prepare(
            "SELECT creators.id, creators.display_name, creators.notes, asset_creators.role
             FROM asset_creators
             JOIN creators ON asset_creators.creator_id = creators.id
             WHERE asset_creators.asset_id = ?1
             ORDER BY creators.display_name, creators.id",
        )?;
        let rows = stmt.query_map(params![asset_id], |row| {
            Ok(CreatorLink {
                creator: Creator::from_row(row)?,
                role: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
