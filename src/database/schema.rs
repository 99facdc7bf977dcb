use rusqlite::Connection;

/// Every statement is `IF NOT EXISTS`, so the batch can run against an initialized store.
pub const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS assets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        asset_type TEXT NOT NULL,
        file_path TEXT NOT NULL UNIQUE,
        file_size INTEGER,
        sha256 TEXT UNIQUE,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS creators (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        display_name TEXT NOT NULL,
        notes TEXT
    );

    CREATE TABLE IF NOT EXISTS sources (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        category TEXT,
        url TEXT,
        notes TEXT
    );

    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS asset_creators (
        asset_id INTEGER NOT NULL,
        creator_id INTEGER NOT NULL,
        role TEXT NOT NULL DEFAULT 'Author',
        PRIMARY KEY(asset_id, creator_id),
        FOREIGN KEY(asset_id) REFERENCES assets(id) ON DELETE CASCADE,
        FOREIGN KEY(creator_id) REFERENCES creators(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS asset_tags (
        asset_id INTEGER NOT NULL,
        tag_id INTEGER NOT NULL,
        PRIMARY KEY(asset_id, tag_id),
        FOREIGN KEY(asset_id) REFERENCES assets(id) ON DELETE CASCADE,
        FOREIGN KEY(tag_id) REFERENCES tags(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS asset_source (
        asset_id INTEGER PRIMARY KEY,
        source_id INTEGER NOT NULL,
        FOREIGN KEY(asset_id) REFERENCES assets(id) ON DELETE CASCADE,
        FOREIGN KEY(source_id) REFERENCES sources(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_creators_display_name ON creators(display_name);
    CREATE INDEX IF NOT EXISTS idx_asset_creators_creator ON asset_creators(creator_id);
    CREATE INDEX IF NOT EXISTS idx_asset_tags_tag ON asset_tags(tag_id);
    CREATE INDEX IF NOT EXISTS idx_asset_source_source ON asset_source(source_id);
    CREATE INDEX IF NOT EXISTS idx_assets_type ON assets(asset_type);
";

/// Enables foreign-key enforcement for this connection and creates any missing relations.
pub fn initialize(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.execute_batch(SCHEMA)
}
