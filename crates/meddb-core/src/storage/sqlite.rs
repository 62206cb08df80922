//! SQLite-backed record store.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::{KeyValueStore, StorageResult, SCHEMA};

/// Record store backed by a single SQLite table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Initialize schema.
    fn initialize(&self) -> StorageResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Keys currently stored, in key order.
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_store ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

impl KeyValueStore for SqliteStore {
    fn load(&self, key: &str) -> StorageResult<Option<serde_json::Value>> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;

        raw.map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(Into::into)
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> StorageResult<()> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')
            "#,
            params![key, json],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setup_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_open_in_memory() {
        let store = SqliteStore::open_in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let store = setup_store();

        let tables: Vec<String> = store
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"kv_store".to_string()));
    }

    #[test]
    fn test_load_missing_key() {
        let store = setup_store();
        assert_eq!(store.load("nothing").unwrap(), None);
    }

    #[test]
    fn test_save_and_load() {
        let store = setup_store();
        let value = json!(["Code", "Brand", "Generic"]);

        store.save("meddb_categories", &value).unwrap();

        assert_eq!(store.load("meddb_categories").unwrap(), Some(value));
    }

    #[test]
    fn test_save_overwrites() {
        let store = setup_store();

        store.save("k", &json!([1])).unwrap();
        store.save("k", &json!([2, 3])).unwrap();

        assert_eq!(store.load("k").unwrap(), Some(json!([2, 3])));
        assert_eq!(store.keys().unwrap(), vec!["k".to_string()]);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meddb.sqlite");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.save("meddb_recycle_bin", &json!([])).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.load("meddb_recycle_bin").unwrap(), Some(json!([])));
    }
}
