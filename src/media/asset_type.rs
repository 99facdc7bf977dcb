use std::fmt;
use std::path::Path;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Image,
    Video,
    Audio,
    Archive,
    Document,
    Data,
    Unknown,
}

const EXTENSIONS: &[(AssetType, &[&str])] = &[
    (AssetType::Image, &["png", "jpg", "jpeg", "webp", "bmp", "tiff", "gif"]),
    (AssetType::Video, &["mp4", "mkv", "avi", "mov", "webm"]),
    (AssetType::Audio, &["mp3", "wav", "flac", "aac", "ogg"]),
    (AssetType::Archive, &["zip", "rar", "7z", "tar", "gz"]),
    (AssetType::Document, &["pdf", "txt", "md", "docx", "xlsx"]),
    (AssetType::Data, &["json", "csv", "xml", "db"]),
];

impl AssetType {
    pub const ALL: [AssetType; 7] = [
        AssetType::Image,
        AssetType::Video,
        AssetType::Audio,
        AssetType::Archive,
        AssetType::Document,
        AssetType::Data,
        AssetType::Unknown,
    ];

    /// Classifies a path by its lowercased final extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| Self::from_extension(&ext.to_ascii_lowercase()))
            .unwrap_or(AssetType::Unknown)
    }

    fn from_extension(ext: &str) -> Self {
        EXTENSIONS
            .iter()
            .find(|(_, exts)| exts.contains(&ext))
            .map(|(kind, _)| *kind)
            .unwrap_or(AssetType::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Image => "image",
            AssetType::Video => "video",
            AssetType::Audio => "audio",
            AssetType::Archive => "archive",
            AssetType::Document => "document",
            AssetType::Data => "data",
            AssetType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("unknown asset type '{}'", s))
    }
}

impl ToSql for AssetType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AssetType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_by_extension() {
        assert_eq!(AssetType::from_path(Path::new("a/b/photo.JPG")), AssetType::Image);
        assert_eq!(AssetType::from_path(Path::new("clip.webm")), AssetType::Video);
        assert_eq!(AssetType::from_path(Path::new("song.flac")), AssetType::Audio);
        assert_eq!(AssetType::from_path(Path::new("backup.tar.gz")), AssetType::Archive);
        assert_eq!(AssetType::from_path(Path::new("notes.md")), AssetType::Document);
        assert_eq!(AssetType::from_path(Path::new("rows.csv")), AssetType::Data);
    }

    #[test]
    fn test_unmatched_extension_is_unknown() {
        assert_eq!(AssetType::from_path(Path::new("binary.exe")), AssetType::Unknown);
        assert_eq!(AssetType::from_path(Path::new("Makefile")), AssetType::Unknown);
        assert_eq!(AssetType::from_path(Path::new(".bashrc")), AssetType::Unknown);
    }

    #[test]
    fn test_parse_round_trips_names() {
        for kind in AssetType::ALL {
            assert_eq!(kind.as_str().parse::<AssetType>().unwrap(), kind);
        }
        assert_eq!(" Image ".parse::<AssetType>().unwrap(), AssetType::Image);
        assert!("sculpture".parse::<AssetType>().is_err());
    }
}
