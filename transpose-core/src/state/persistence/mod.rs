pub mod record;
pub mod schema;
mod tests;

pub use record::{KeybindRecord, StoredBinding, KEYBIND_SCHEMA_VERSION};

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection as SqlConnection, OptionalExtension, Result as SqlResult};

/// Failure while reading or writing a keybind configuration.
#[derive(Debug)]
pub enum PersistenceError {
    Sql(rusqlite::Error),
    Json(String),
    UnsupportedVersion { found: u32, supported: u32 },
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceError::Sql(e) => write!(f, "sqlite: {}", e),
            PersistenceError::Json(e) => write!(f, "malformed keybind json: {}", e),
            PersistenceError::UnsupportedVersion { found, supported } => write!(
                f,
                "keybind schema version {} is newer than supported ({})",
                found, supported
            ),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Sql(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(e: rusqlite::Error) -> Self {
        PersistenceError::Sql(e)
    }
}

/// Durable storage for keybind configurations: one JSON blob per config name.
pub trait ConfigStore {
    fn load(&self, config_name: &str) -> Result<Option<String>, PersistenceError>;
    fn save(&mut self, config_name: &str, json: &str, is_default: bool) -> Result<(), PersistenceError>;
}

/// SQLite-backed store using the `KeyBindConfig` table.
pub struct SqliteConfigStore {
    conn: SqlConnection,
}

impl SqliteConfigStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> SqlResult<Self> {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let conn = SqlConnection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        schema::create_tables(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> SqlResult<Self> {
        let conn = SqlConnection::open_in_memory()?;
        schema::create_tables(&conn)?;
        Ok(Self { conn })
    }

    pub fn schema_version(&self) -> SqlResult<Option<i32>> {
        schema::stored_version(&self.conn)
    }

    /// Whether the row for `config_name` is flagged as the default configuration.
    pub fn is_default(&self, config_name: &str) -> SqlResult<Option<bool>> {
        self.conn
            .query_row(
                "SELECT isDefault FROM KeyBindConfig WHERE name = ?1",
                params![config_name],
                |row| row.get(0),
            )
            .optional()
    }
}

impl ConfigStore for SqliteConfigStore {
    fn load(&self, config_name: &str) -> Result<Option<String>, PersistenceError> {
        let json: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT json FROM KeyBindConfig WHERE name = ?1",
                params![config_name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(json.flatten())
    }

    fn save(&mut self, config_name: &str, json: &str, is_default: bool) -> Result<(), PersistenceError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO KeyBindConfig (name, json, isDefault) VALUES (?1, ?2, ?3)",
            params![config_name, json, is_default],
        )?;
        Ok(())
    }
}

/// Volatile store used when the database cannot be opened.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    rows: HashMap<String, String>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(config_name: &str, json: &str) -> Self {
        let mut store = Self::new();
        store.rows.insert(config_name.to_string(), json.to_string());
        store
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self, config_name: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.rows.get(config_name).cloned())
    }

    fn save(&mut self, config_name: &str, json: &str, _is_default: bool) -> Result<(), PersistenceError> {
        self.rows.insert(config_name.to_string(), json.to_string());
        Ok(())
    }
}
