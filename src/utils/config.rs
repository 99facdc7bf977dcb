use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

pub const DB_ENV_KEY: &str = "ASSET_CATALOG_DB";
pub const DEFAULT_DB_PATH: &str = "asset_catalog.db";
pub const ENV_FILE: &str = ".env";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub db_path: PathBuf,
}

/// Picks the database path: explicit argument, then the environment variable,
/// then the `.env` file, then the default next to the working directory.
pub fn resolve(explicit: Option<PathBuf>, env_file: &Path) -> Result<CatalogConfig> {
    if let Some(db_path) = explicit {
        return Ok(CatalogConfig { db_path });
    }

    if let Some(value) = std::env::var_os(DB_ENV_KEY).filter(|v| !v.is_empty()) {
        info!("Using catalog path from {}", DB_ENV_KEY);
        return Ok(CatalogConfig {
            db_path: PathBuf::from(value),
        });
    }

    if env_file.exists() {
        if let Some(db_path) = load_from_env(env_file)? {
            info!("Loaded catalog path from {:?}", env_file);
            return Ok(CatalogConfig { db_path });
        }
    }

    Ok(CatalogConfig {
        db_path: PathBuf::from(DEFAULT_DB_PATH),
    })
}

fn load_from_env(path: &Path) -> Result<Option<PathBuf>> {
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let reader = BufReader::new(file);

    for line in reader.lines() {
        let line = line?;
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == DB_ENV_KEY && !value.trim().is_empty() {
                return Ok(Some(PathBuf::from(value.trim())));
            }
        }
    }
    Ok(None)
}

/// Writes the database path into the env file, keeping any unrelated lines.
pub fn save_to_env(path: &Path, db_path: &Path) -> Result<()> {
    let mut kept = Vec::new();
    if path.exists() {
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        for line in BufReader::new(file).lines() {
            let line = line?;
            let is_ours = line
                .split_once('=')
                .map(|(key, _)| key.trim() == DB_ENV_KEY)
                .unwrap_or(false);
            if !is_ours {
                kept.push(line);
            }
        }
    }

    let mut file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    for line in kept {
        writeln!(file, "{}", line)?;
    }
    writeln!(file, "{}={}", DB_ENV_KEY, db_path.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_env() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(".env");
        fs::write(&path, "OTHER=1\nASSET_CATALOG_DB=/old/path.db\n")?;

        save_to_env(&path, Path::new("/tmp/assets.db"))?;

        let content = fs::read_to_string(&path)?;
        assert!(content.contains("OTHER=1"));
        assert!(content.contains("ASSET_CATALOG_DB=/tmp/assets.db"));
        assert!(!content.contains("/old/path.db"));

        assert_eq!(load_from_env(&path)?, Some(PathBuf::from("/tmp/assets.db")));
        Ok(())
    }

    #[test]
    fn test_explicit_path_wins() -> Result<()> {
        let dir = tempdir()?;
        let config = resolve(Some(PathBuf::from("mine.db")), &dir.path().join(".env"))?;
        assert_eq!(config.db_path, PathBuf::from("mine.db"));
        Ok(())
    }

    #[test]
    fn test_env_file_without_key_is_ignored() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(".env");
        fs::write(&path, "UNRELATED=value\n")?;
        assert_eq!(load_from_env(&path)?, None);
        Ok(())
    }
}
