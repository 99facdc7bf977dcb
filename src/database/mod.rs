pub mod creators;
pub mod repo;
pub mod schema;
pub mod search;
pub mod sources;
pub mod tags;

pub use creators::{Creator, CreatorLink};
pub use repo::{Asset, Catalog};
pub use sources::Source;
pub use tags::Tag;

/// Lowercased, trimmed tag name used for storage and every lookup.
pub fn normalize_tag(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag(" Nature "), "nature");
        assert_eq!(normalize_tag("LANDSCAPE"), "landscape");
        assert_eq!(normalize_tag("\tNight Sky\n"), "night sky");
    }
}
