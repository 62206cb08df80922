//! Catalog store: the single owner of active medicines, the recycle bin
//! and the category list.
//!
//! Every mutation validates first, then updates memory, then persists the
//! touched records. A persistence failure is returned to the caller as-is;
//! memory is not rolled back, so it stays ahead of storage until the next
//! successful write.

mod categories;
mod medicines;
pub mod query;
mod seed;
mod snapshot;

pub use seed::sample_medicines;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::backup::BackupError;
use crate::config::CatalogConfig;
use crate::models::{default_categories, Category, Medicine};
use crate::storage::{
    KeyValueStore, StorageError, CATEGORIES_KEY, MEDICINES_KEY, RECYCLE_BIN_KEY,
};

/// Catalog errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Duplicate code: {0}")]
    DuplicateCode(String),

    #[error("Medicine not found: {0}")]
    NotFound(String),

    #[error("Invalid backup: {0}")]
    Parse(#[from] BackupError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// The medicine catalog backed by a [`KeyValueStore`].
pub struct CatalogStore<S: KeyValueStore> {
    store: S,
    config: CatalogConfig,
    medicines: Vec<Medicine>,
    recycle_bin: Vec<Medicine>,
    categories: Vec<Category>,
}

impl<S: KeyValueStore> CatalogStore<S> {
    /// Load the catalog from `store`.
    ///
    /// First launch (no medicines record) installs the sample catalog when
    /// `config.seed_sample_data` is set, otherwise an empty list. A missing
    /// category record installs the default tabs. Both are persisted.
    pub fn open(store: S, config: CatalogConfig) -> CatalogResult<Self> {
        let medicines = match load_record::<_, Vec<Medicine>>(&store, MEDICINES_KEY)? {
            Some(meds) => meds,
            None => {
                let meds = if config.seed_sample_data {
                    seed::sample_medicines(chrono::Utc::now().timestamp_millis())
                } else {
                    Vec::new()
                };
                info!(count = meds.len(), "initializing medicine list");
                save_record(&store, MEDICINES_KEY, &meds)?;
                meds
            }
        };

        let recycle_bin: Vec<Medicine> =
            load_record(&store, RECYCLE_BIN_KEY)?.unwrap_or_default();

        let categories = match load_record::<_, Vec<Category>>(&store, CATEGORIES_KEY)? {
            Some(cats) => cats,
            None => {
                let cats = default_categories();
                info!(count = cats.len(), "initializing default categories");
                save_record(&store, CATEGORIES_KEY, &cats)?;
                cats
            }
        };

        debug!(
            medicines = medicines.len(),
            recycle_bin = recycle_bin.len(),
            categories = categories.len(),
            "catalog loaded"
        );

        Ok(Self {
            store,
            config,
            medicines,
            recycle_bin,
            categories,
        })
    }

    /// Active medicines, most recently added or restored first.
    pub fn medicines(&self) -> &[Medicine] {
        &self.medicines
    }

    /// Recycle bin, most recently deleted first.
    pub fn recycle_bin(&self) -> &[Medicine] {
        &self.recycle_bin
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The tab selected on launch: the first category, or empty.
    pub fn default_category(&self) -> &str {
        self.categories.first().map(String::as_str).unwrap_or("")
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// The underlying record store.
    pub fn backend(&self) -> &S {
        &self.store
    }

    /// Active medicine by ID.
    pub fn get(&self, id: &str) -> Option<&Medicine> {
        self.medicines.iter().find(|m| m.id == id)
    }

    /// Recycle-bin entry by ID.
    pub fn find_in_bin(&self, id: &str) -> Option<&Medicine> {
        self.recycle_bin.iter().find(|m| m.id == id)
    }

    /// Filtered, sorted list for a category tab and search text.
    pub fn view(&self, category: &str, query: &str) -> Vec<Medicine> {
        query::view(&self.medicines, category, query)
    }

    /// Other active medicines sharing the brand stem of `id`.
    pub fn variants(&self, id: &str) -> Vec<Medicine> {
        self.get(id)
            .map(|m| query::variants(&self.medicines, m))
            .unwrap_or_default()
    }

    /// Active medicines, newest first.
    pub fn recent(&self) -> Vec<Medicine> {
        query::recent(&self.medicines)
    }

    fn persist_medicines(&self) -> CatalogResult<()> {
        save_record(&self.store, MEDICINES_KEY, &self.medicines)
    }

    fn persist_recycle_bin(&self) -> CatalogResult<()> {
        save_record(&self.store, RECYCLE_BIN_KEY, &self.recycle_bin)
    }

    fn persist_categories(&self) -> CatalogResult<()> {
        save_record(&self.store, CATEGORIES_KEY, &self.categories)
    }
}

fn load_record<S: KeyValueStore, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> CatalogResult<Option<T>> {
    let Some(value) = store.load(key)? else {
        return Ok(None);
    };
    let record = serde_json::from_value(value).map_err(StorageError::from)?;
    Ok(Some(record))
}

fn save_record<S: KeyValueStore, T: Serialize + ?Sized>(
    store: &S,
    key: &str,
    record: &T,
) -> CatalogResult<()> {
    let value = serde_json::to_value(record).map_err(StorageError::from)?;
    store.save(key, &value)?;
    debug!(key, "record persisted");
    Ok(())
}
