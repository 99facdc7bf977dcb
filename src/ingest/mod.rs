pub mod hasher;
pub mod scanner;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CatalogError, Result};
use crate::media::AssetType;

/// Everything derived from a file before it is stored as an asset row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIdentity {
    pub file_path: PathBuf,
    pub title: String,
    pub asset_type: AssetType,
    pub file_size: u64,
    pub content_hash: String,
}

impl FileIdentity {
    /// Resolves `path` to its canonical absolute form and reads size, hash and type from it.
    /// `title` falls back to the file stem.
    pub fn from_path(path: &Path, title: Option<&str>) -> Result<Self> {
        let file_path = fs::canonicalize(path).map_err(|e| CatalogError::io(path, e))?;
        utf8_path(&file_path)?;
        let metadata = fs::metadata(&file_path).map_err(|e| CatalogError::io(&file_path, e))?;
        if !metadata.is_file() {
            return Err(CatalogError::FileNotFound(file_path));
        }

        let title = match title {
            Some(t) => t.to_string(),
            None => file_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };

        Ok(Self {
            asset_type: AssetType::from_path(&file_path),
            file_size: metadata.len(),
            content_hash: hasher::calculate_hash(&file_path)?,
            title,
            file_path,
        })
    }
}

/// Stored paths must round-trip exactly, so non-UTF-8 paths are refused.
pub(crate) fn utf8_path(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| CatalogError::Validation {
        field: "file_path",
        reason: format!("{:?} is not valid UTF-8", path),
    })
}

/// Outcome of registering one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingested {
    /// A new asset row was inserted.
    Added(i64),
    /// An asset with the same path or content already existed; it was left untouched.
    Duplicate(i64),
}

impl Ingested {
    pub fn id(&self) -> i64 {
        match self {
            Ingested::Added(id) | Ingested::Duplicate(id) => *id,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, Ingested::Added(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct IngestSummary {
    pub added: usize,
    pub duplicates: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_identity_defaults_title_to_stem() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("Sunset Beach.JPEG");
        fs::write(&path, vec![7u8; 2048])?;

        let identity = FileIdentity::from_path(&path, None)?;
        assert_eq!(identity.title, "Sunset Beach");
        assert_eq!(identity.asset_type, AssetType::Image);
        assert_eq!(identity.file_size, 2048);
        assert_eq!(identity.content_hash.len(), 64);
        assert!(identity.file_path.is_absolute());
        Ok(())
    }

    #[test]
    fn test_identity_keeps_explicit_title() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("track01.wav");
        fs::write(&path, b"RIFF")?;

        let identity = FileIdentity::from_path(&path, Some("Opening Theme"))?;
        assert_eq!(identity.title, "Opening Theme");
        assert_eq!(identity.asset_type, AssetType::Audio);
        Ok(())
    }

    #[test]
    fn test_identity_canonicalizes_relative_segments() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("sub"))?;
        let path = dir.path().join("doc.pdf");
        fs::write(&path, b"%PDF")?;

        let indirect = dir.path().join("sub").join("..").join("doc.pdf");
        let identity = FileIdentity::from_path(&indirect, None)?;
        assert_eq!(identity.file_path, fs::canonicalize(&path)?);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_is_rejected() -> anyhow::Result<()> {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir()?;
        let path = dir.path().join(OsStr::from_bytes(b"img\xff.png"));
        fs::write(&path, b"first")?;

        let err = FileIdentity::from_path(&path, None).unwrap_err();
        assert!(matches!(err, CatalogError::Validation { field: "file_path", .. }));
        Ok(())
    }

    #[test]
    fn test_missing_file_and_directory_are_not_found() {
        let dir = tempdir().unwrap();
        assert!(FileIdentity::from_path(&dir.path().join("gone.png"), None)
            .unwrap_err()
            .is_not_found());
        assert!(FileIdentity::from_path(dir.path(), None)
            .unwrap_err()
            .is_not_found());
    }
}
