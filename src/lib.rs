//! Local catalog for digital assets: content-addressed ingestion plus creators, tags and
//! sources linked to each asset, stored in SQLite.

pub mod database;
pub mod error;
pub mod ingest;
pub mod media;
pub mod utils;

pub use database::{normalize_tag, Asset, Catalog, Creator, CreatorLink, Source, Tag};
pub use error::{CatalogError, Result};
pub use ingest::{IngestSummary, Ingested};
pub use media::AssetType;
