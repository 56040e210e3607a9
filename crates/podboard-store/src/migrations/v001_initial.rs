//! v001 -- Initial schema creation.
//!
//! Creates the single `kv_store` table. Each entity collection, the sequence
//! map, the settings and the session are stored as one JSON document per key.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS kv_store (
    key        TEXT PRIMARY KEY NOT NULL,   -- e.g. 'podboard.projects'
    json       TEXT NOT NULL,               -- whole-collection JSON document
    updated_at TEXT NOT NULL                -- ISO-8601 / RFC-3339
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
