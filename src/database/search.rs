use rusqlite::params;

use crate::database::repo::ASSET_COLUMNS;
use crate::database::{normalize_tag, Asset, Catalog};
use crate::error::Result;
use crate::media::AssetType;

impl Catalog {
    /// Assets carrying the tag; the name is normalized like every stored tag.
    pub fn search_by_tag(&self, tag_name: &str) -> Result<Vec<Asset>> {
        let sql = format!(
            "SELECT {} FROM assets
             JOIN asset_tags ON assets.id = asset_tags.asset_id
             JOIN tags ON asset_tags.tag_id = tags.id
             WHERE tags.name = ?1",
            ASSET_COLUMNS
        );
        self.query_assets(&sql, params![normalize_tag(tag_name)])
    }

    /// Exact display-name match after trimming; case is significant.
    pub fn search_by_creator(&self, creator_name: &str) -> Result<Vec<Asset>> {
        let sql = format!(
            "SELECT DISTINCT {} FROM assets
             JOIN asset_creators ON assets.id = asset_creators.asset_id
             JOIN creators ON asset_creators.creator_id = creators.id
             WHERE creators.display_name = ?1",
            ASSET_COLUMNS
        );
        self.query_assets(&sql, params![creator_name.trim()])
    }

    pub fn search_by_type(&self, asset_type: AssetType) -> Result<Vec<Asset>> {
        let sql = format!("SELECT {} FROM assets WHERE asset_type = ?1", ASSET_COLUMNS);
        self.query_assets(&sql, params![asset_type])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn add(catalog: &mut Catalog, dir: &TempDir, name: &str) -> i64 {
        let path: PathBuf = dir.path().join(name);
        fs::write(&path, name.as_bytes()).unwrap();
        catalog.add_asset(&path, None).unwrap().id()
    }

    #[test]
    fn test_search_by_tag_normalizes_query() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::open_in_memory().unwrap();
        let a = add(&mut catalog, &dir, "lake.png");
        add(&mut catalog, &dir, "city.png");
        catalog.add_tag("nature").unwrap();
        catalog.tag_asset(a, " Nature ").unwrap();

        let found = catalog.search_by_tag("NATURE ").unwrap();
        assert_eq!(found.iter().map(|x| x.id).collect::<Vec<_>>(), vec![a]);
        assert!(catalog.search_by_tag("urban").unwrap().is_empty());
    }

    #[test]
    fn test_search_by_creator_is_case_sensitive_but_trimmed() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::open_in_memory().unwrap();
        let a = add(&mut catalog, &dir, "score.pdf");
        catalog.add_creator("Clara Schumann", None).unwrap();
        let creator = catalog.list_creators().unwrap()[0].id;
        catalog.link_creator(a, creator, Some("Composer")).unwrap();

        assert_eq!(catalog.search_by_creator("  Clara Schumann ").unwrap().len(), 1);
        assert!(catalog.search_by_creator("clara schumann").unwrap().is_empty());
    }

    #[test]
    fn test_search_by_type() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::open_in_memory().unwrap();
        let img = add(&mut catalog, &dir, "pic.gif");
        add(&mut catalog, &dir, "data.json");

        let images = catalog.search_by_type(AssetType::Image).unwrap();
        assert_eq!(images.iter().map(|x| x.id).collect::<Vec<_>>(), vec![img]);
        assert!(catalog.search_by_type(AssetType::Video).unwrap().is_empty());
    }
}
