use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;
use tracing::debug;

use crate::database::Catalog;
use crate::error::{require_name, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

impl Source {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            url: row.get(3)?,
            notes: row.get(4)?,
        })
    }
}

const SOURCE_COLUMNS: &str = "sources.id, sources.name, sources.category, sources.url, sources.notes";

impl Catalog {
    /// Adds a source unless one with the same name exists.
    pub fn add_source(
        &mut self,
        name: &str,
        category: Option<&str>,
        url: Option<&str>,
        notes: Option<&str>,
    ) -> Result<()> {
        let name = require_name("source name", name)?;
        let inserted = self.write(|conn| {
            Ok(conn.execute(
                "INSERT OR IGNORE INTO sources (name, category, url, notes) VALUES (?1, ?2, ?3, ?4)",
                params![name, category, url, notes],
            )?)
        })?;
        if inserted > 0 {
            debug!("Added source {:?}", name);
        }
        Ok(())
    }

    /// Removes the source; assets it backed lose their source link.
    pub fn delete_source(&mut self, id: i64) -> Result<()> {
        self.write(|conn| {
            conn.execute("DELETE FROM sources WHERE id = ?1", params![id])?;
            Ok(())
        })
    }

    pub fn get_source(&self, id: i64) -> Result<Option<Source>> {
        let sql = format!("SELECT {} FROM sources WHERE id = ?1", SOURCE_COLUMNS);
        let source = self
            .conn
            .query_row(&sql, params![id], Source::from_row)
            .optional()?;
        Ok(source)
    }

    pub fn list_sources(&self) -> Result<Vec<Source>> {
        let sql = format!("SELECT {} FROM sources ORDER BY name", SOURCE_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], Source::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Records where an asset came from. An asset already linked to a source keeps its link.
    pub fn link_source(&mut self, asset_id: i64, source_id: i64) -> Result<()> {
        let linked = self.write(|conn| {
            Ok(conn.execute(
                "INSERT OR IGNORE INTO asset_source (asset_id, source_id) VALUES (?1, ?2)",
                params![asset_id, source_id],
            )?)
        })?;
        if linked > 0 {
            debug!("Linked source {} to asset {}", source_id, asset_id);
        }
        Ok(())
    }

    /// Removes the link only when it points at `source_id`.
    pub fn unlink_source(&mut self, asset_id: i64, source_id: i64) -> Result<()> {
        self.write(|conn| {
            conn.execute(
                "DELETE FROM asset_source WHERE asset_id = ?1 AND source_id = ?2",
                params![asset_id, source_id],
            )?;
            Ok(())
        })
    }

    pub fn source_of(&self, asset_id: i64) -> Result<Option<Source>> {
        let sql = format!(
            "SELECT {} FROM asset_source
             JOIN sources ON asset_source.source_id = sources.id
             WHERE asset_source.asset_id = ?1",
            SOURCE_COLUMNS
        );
        let source = self
            .conn
            .query_row(&sql, params![asset_id], Source::from_row)
            .optional()?;
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn catalog_with_assets(n: usize) -> (Catalog, Vec<i64>, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::open_in_memory().unwrap();
        let ids = (0..n)
            .map(|i| {
                let path = dir.path().join(format!("scan{}.pdf", i));
                fs::write(&path, format!("page {}", i)).unwrap();
                catalog.add_asset(&path, None).unwrap().id()
            })
            .collect();
        (catalog, ids, dir)
    }

    fn source_id(catalog: &Catalog, name: &str) -> i64 {
        catalog
            .list_sources()
            .unwrap()
            .into_iter()
            .find(|s| s.name == name)
            .unwrap()
            .id
    }

    #[test]
    fn test_add_source_is_idempotent_by_name() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        catalog
            .add_source("Archive.org", Some("library"), Some("https://archive.org"), None)
            .unwrap();
        catalog.add_source("Archive.org", Some("other"), None, None).unwrap();

        let sources = catalog.list_sources().unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].category.as_deref(), Some("library"));
        assert_eq!(sources[0].url.as_deref(), Some("https://archive.org"));
    }

    #[test]
    fn test_one_source_per_asset_first_link_wins() {
        let (mut catalog, ids, _dir) = catalog_with_assets(1);
        catalog.add_source("Scanner", None, None, None).unwrap();
        catalog.add_source("Camera", None, None, None).unwrap();
        let scanner = source_id(&catalog, "Scanner");
        let camera = source_id(&catalog, "Camera");

        catalog.link_source(ids[0], scanner).unwrap();
        catalog.link_source(ids[0], camera).unwrap();

        assert_eq!(catalog.source_of(ids[0]).unwrap().map(|s| s.id), Some(scanner));
        assert_eq!(catalog.count("asset_source"), 1);
    }

    #[test]
    fn test_source_backs_many_assets() {
        let (mut catalog, ids, _dir) = catalog_with_assets(3);
        catalog.add_source("Scanner", None, None, None).unwrap();
        let scanner = source_id(&catalog, "Scanner");

        for id in &ids {
            catalog.link_source(*id, scanner).unwrap();
        }
        assert_eq!(catalog.count("asset_source"), 3);

        catalog.delete_source(scanner).unwrap();
        assert_eq!(catalog.count("asset_source"), 0);
        assert_eq!(catalog.list_assets().unwrap().len(), 3);
    }

    #[test]
    fn test_link_unknown_source_is_integrity_error() {
        let (mut catalog, ids, _dir) = catalog_with_assets(1);
        assert!(catalog.link_source(ids[0], 12).unwrap_err().is_integrity());
        assert!(catalog.source_of(ids[0]).unwrap().is_none());
    }

    #[test]
    fn test_link_source_to_unknown_asset_is_integrity_error() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        catalog.add_source("Scanner", None, None, None).unwrap();
        let scanner = source_id(&catalog, "Scanner");

        assert!(catalog.link_source(404, scanner).unwrap_err().is_integrity());
        assert_eq!(catalog.count("asset_source"), 0);
    }

    #[test]
    fn test_unlink_source_requires_matching_pair() {
        let (mut catalog, ids, _dir) = catalog_with_assets(1);
        catalog.add_source("Scanner", None, None, None).unwrap();
        catalog.add_source("Camera", None, None, None).unwrap();
        let scanner = source_id(&catalog, "Scanner");
        let camera = source_id(&catalog, "Camera");
        catalog.link_source(ids[0], scanner).unwrap();

        catalog.unlink_source(ids[0], camera).unwrap();
        assert!(catalog.source_of(ids[0]).unwrap().is_some());

        catalog.unlink_source(ids[0], scanner).unwrap();
        assert!(catalog.source_of(ids[0]).unwrap().is_none());
    }
}
