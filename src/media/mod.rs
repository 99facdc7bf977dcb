pub mod asset_type;

pub use asset_type::AssetType;
