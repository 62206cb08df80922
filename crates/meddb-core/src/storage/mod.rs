//! Persistence layer for meddb.
//!
//! The catalog is stored as three independent JSON records under stable
//! keys. [`KeyValueStore`] abstracts where they live: SQLite on device,
//! memory in tests.

mod files;
mod memory;
mod schema;
mod sqlite;

pub use files::*;
pub use memory::*;
pub use schema::*;
pub use sqlite::*;

use std::path::PathBuf;
use thiserror::Error;

/// Key of the active medicine list.
pub const MEDICINES_KEY: &str = "meddb_offline_data";
/// Key of the recycle bin.
pub const RECYCLE_BIN_KEY: &str = "meddb_recycle_bin";
/// Key of the category list.
pub const CATEGORIES_KEY: &str = "meddb_categories";

/// Storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable key-value storage of JSON values.
pub trait KeyValueStore {
    /// Load the value stored under `key`, or `None` if never written.
    fn load(&self, key: &str) -> StorageResult<Option<serde_json::Value>>;

    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &serde_json::Value) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn load(&self, key: &str) -> StorageResult<Option<serde_json::Value>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> StorageResult<()> {
        (**self).save(key, value)
    }
}
