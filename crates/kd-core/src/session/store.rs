//! Durable persistence: a namespaced key-value store over SQLite
//!
//! The store only holds opaque string blobs; it has no independent
//! lifecycle. Tests inject [`MemoryKvStore`] instead.

use std::collections::HashMap;
use std::sync::Mutex;

use rusqlite::{Connection, params};
use tracing::debug;

use crate::Result;

/// Key under which the full session snapshot is stored
pub const SNAPSHOT_KEY: &str = "kissan_chat_sessions";

/// Key under which the downloaded-guide id list is stored
pub const GUIDES_KEY: &str = "kissan_offline_guides";

/// Namespaced key-value persistence port
pub trait KeyValueStore: Send + Sync {
    /// Fetch the blob stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous blob
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed key-value store
pub struct SqliteKvStore {
    conn: Mutex<Connection>,
}

impl SqliteKvStore {
    /// Open (or create) the store at the given database path
    pub fn new(db_path: &str) -> Result<Self> {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        debug!("Opening key-value store at: {}", db_path);
        let conn = Connection::open(db_path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_tables()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_tables()?;
        Ok(store)
    }

    /// Initialize database tables
    fn init_tables(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-memory key-value store for unit tests
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = SqliteKvStore::in_memory().unwrap();
        assert!(store.get("absent").unwrap().is_none());
    }

    #[test]
    fn test_set_and_get() {
        let store = SqliteKvStore::in_memory().unwrap();
        store.set(SNAPSHOT_KEY, "[1,2,3]").unwrap();
        assert_eq!(store.get(SNAPSHOT_KEY).unwrap().unwrap(), "[1,2,3]");
    }

    #[test]
    fn test_set_replaces() {
        let store = SqliteKvStore::in_memory().unwrap();
        store.set("k", "old").unwrap();
        store.set("k", "new").unwrap();
        assert_eq!(store.get("k").unwrap().unwrap(), "new");
    }

    #[test]
    fn test_keys_are_independent() {
        let store = SqliteKvStore::in_memory().unwrap();
        store.set(SNAPSHOT_KEY, "sessions").unwrap();
        store.set(GUIDES_KEY, "guides").unwrap();
        assert_eq!(store.get(SNAPSHOT_KEY).unwrap().unwrap(), "sessions");
        assert_eq!(store.get(GUIDES_KEY).unwrap().unwrap(), "guides");
    }

    #[test]
    fn test_on_disk_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.db");
        let path = path.to_str().unwrap();

        {
            let store = SqliteKvStore::new(path).unwrap();
            store.set("k", "v").unwrap();
        }

        let store = SqliteKvStore::new(path).unwrap();
        assert_eq!(store.get("k").unwrap().unwrap(), "v");
    }

    #[test]
    fn test_new_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/kv.db");
        let store = SqliteKvStore::new(path.to_str().unwrap()).unwrap();
        store.set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryKvStore::new();
        assert!(store.get("k").unwrap().is_none());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().unwrap(), "v");
    }
}
