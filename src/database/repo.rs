use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::database::schema;
use crate::error::{CatalogError, Result};
use crate::ingest::{scanner, utf8_path, FileIdentity, IngestSummary, Ingested};
use crate::media::AssetType;

/// Column list for asset rows, qualified so it also works in joins.
pub(crate) const ASSET_COLUMNS: &str = "assets.id, assets.title, assets.asset_type, assets.file_path, \
     assets.file_size, assets.sha256, assets.created_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub id: i64,
    pub title: String,
    pub asset_type: AssetType,
    pub file_path: PathBuf,
    pub file_size: Option<u64>,
    pub content_hash: Option<String>,
    pub created_at: String,
}

impl Asset {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let file_path: String = row.get(3)?;
        let file_size: Option<i64> = row.get(4)?;
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            asset_type: row.get(2)?,
            file_path: PathBuf::from(file_path),
            file_size: file_size.map(|s| s as u64),
            content_hash: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

/// Handle on one catalog store. Each write runs in its own transaction.
pub struct Catalog {
    pub(crate) conn: Connection,
}

impl Catalog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        debug!("Opened catalog at {:?}", path);
        Ok(Self { conn })
    }

    /// Private store that disappears with the handle.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Runs `f` inside a transaction; commits on `Ok`, rolls back when the error drops it.
    pub(crate) fn write<T>(&mut self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let tx = self.conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    /// Registers the file at `path`. A path or content already in the catalog is a no-op.
    pub fn add_asset(&mut self, path: impl AsRef<Path>, title: Option<&str>) -> Result<Ingested> {
        let identity = FileIdentity::from_path(path.as_ref(), title)?;
        let outcome = self.insert_asset(&identity)?;
        match outcome {
            Ingested::Added(id) => info!("Added asset {} from {:?}", id, identity.file_path),
            Ingested::Duplicate(id) => {
                info!("Skipped {:?}: already cataloged as asset {}", identity.file_path, id)
            }
        }
        Ok(outcome)
    }

    pub(crate) fn insert_asset(&mut self, identity: &FileIdentity) -> Result<Ingested> {
        let file_path = utf8_path(&identity.file_path)?;
        self.write(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO assets (title, asset_type, file_path, file_size, sha256)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    identity.title,
                    identity.asset_type,
                    file_path,
                    identity.file_size as i64,
                    identity.content_hash
                ],
            )?;
            if inserted == 1 {
                return Ok(Ingested::Added(conn.last_insert_rowid()));
            }

            let existing: i64 = conn.query_row(
                "SELECT id FROM assets WHERE file_path = ?1 OR sha256 = ?2 ORDER BY id LIMIT 1",
                params![file_path, identity.content_hash],
                |row| row.get(0),
            )?;
            Ok(Ingested::Duplicate(existing))
        })
    }

    /// Ingests every visible regular file below `root`. Per-file failures are counted, not returned.
    pub fn add_directory(&mut self, root: impl AsRef<Path>) -> Result<IngestSummary> {
        let root = root.as_ref();
        let mut summary = IngestSummary::default();
        let catalog_files = self.catalog_files();

        for path in scanner::scan_directory(root)? {
            let is_catalog_file = fs::canonicalize(&path)
                .map(|p| catalog_files.contains(&p))
                .unwrap_or(false);
            if is_catalog_file {
                debug!("Skipping catalog database file {:?}", path);
                continue;
            }
            match self.add_asset(&path, None) {
                Ok(Ingested::Added(_)) => summary.added += 1,
                Ok(Ingested::Duplicate(_)) => summary.duplicates += 1,
                Err(e @ CatalogError::Database(_)) => return Err(e),
                Err(e) => {
                    warn!("Failed to ingest {:?}: {}", path, e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Ingested {:?}: {} added, {} duplicates, {} failed",
            root, summary.added, summary.duplicates, summary.failed
        );
        Ok(summary)
    }

    /// Canonical paths of the open database and its journal files; empty for in-memory stores.
    fn catalog_files(&self) -> Vec<PathBuf> {
        let Some(db) = self.conn.path().filter(|p| !p.is_empty()) else {
            return Vec::new();
        };
        let Ok(db) = fs::canonicalize(db) else {
            return Vec::new();
        };
        let mut files = vec![db.clone()];
        for suffix in ["-journal", "-wal", "-shm"] {
            let mut name = db.clone().into_os_string();
            name.push(suffix);
            files.push(PathBuf::from(name));
        }
        files
    }

    pub fn get_asset(&self, id: i64) -> Result<Option<Asset>> {
        let sql = format!("SELECT {} FROM assets WHERE id = ?1", ASSET_COLUMNS);
        let asset = self
            .conn
            .query_row(&sql, params![id], Asset::from_row)
            .optional()?;
        Ok(asset)
    }

    pub fn list_assets(&self) -> Result<Vec<Asset>> {
        let sql = format!("SELECT {} FROM assets", ASSET_COLUMNS);
        self.query_assets(&sql, [])
    }

    /// Removes the asset with its creator, tag and source links. Unknown ids are a no-op.
    pub fn delete_asset(&mut self, id: i64) -> Result<()> {
        let removed = self.write(|conn| Ok(conn.execute("DELETE FROM assets WHERE id = ?1", params![id])?))?;
        if removed > 0 {
            debug!("Deleted asset {}", id);
        }
        Ok(())
    }

    pub(crate) fn query_assets<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Asset>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, Asset::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    #[cfg(test)]
    pub(crate) fn count(&self, table: &str) -> i64 {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .unwrap()
    }
}
