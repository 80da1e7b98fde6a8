use rusqlite::{params, Connection, Result as SqlResult};

/// Schema version for the keybind database.
pub const SCHEMA_VERSION: i32 = 1;

/// Create all tables and record the schema version.
pub fn create_tables(conn: &Connection) -> SqlResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
        params![SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Highest schema version recorded in the database, if any.
pub fn stored_version(conn: &Connection) -> SqlResult<Option<i32>> {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
}

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS KeyBindConfig (
    name TEXT PRIMARY KEY,
    json TEXT,
    isDefault BOOLEAN NOT NULL DEFAULT 0
);
";
