//! MedDB Core Library
//!
//! Offline medicine catalog for a single device: browse by category tab,
//! search, edit, recycle bin, and JSON backups.
//!
//! # Architecture
//!
//! ```text
//!              Mobile UI (Swift / Kotlin)
//!                        │
//!                  MedDbCore (FFI)
//!                        │
//!       ┌────────────────┼──────────────────┐
//!       │                │                  │
//!       ▼                ▼                  ▼
//!  Query Engine    Catalog Store    Backup / Restore
//!  (pure views)    (single owner)   (JSON envelope)
//!                        │
//!                        ▼
//!                 KeyValueStore
//!     meddb_offline_data · meddb_recycle_bin · meddb_categories
//! ```
//!
//! # Modules
//!
//! - [`storage`]: JSON record persistence (SQLite, in-memory) and backup files
//! - [`models`]: Domain types (Medicine, categories, prices)
//! - [`catalog`]: The catalog store and its query engine
//! - [`backup`]: Backup envelope codec and restore flow
//! - [`config`]: Catalog configuration

pub mod backup;
pub mod catalog;
pub mod config;
pub mod models;
pub mod storage;

// Re-export commonly used types
pub use backup::{RestoreFlow, RestorePhase, Snapshot, SnapshotKey, SnapshotPatch};
pub use catalog::{CatalogError, CatalogResult, CatalogStore};
pub use config::{CatalogConfig, RestorePolicy};
pub use models::{
    Category, DetailSection, Medicine, MedicineDetails, MedicineInput, VirtualCategory,
};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::Path;
use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MedDbError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Duplicate code: {0}")]
    DuplicateCode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<CatalogError> for MedDbError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Validation(msg) => MedDbError::Validation(msg),
            CatalogError::DuplicateCode(code) => MedDbError::DuplicateCode(code),
            CatalogError::NotFound(id) => MedDbError::NotFound(id),
            CatalogError::Parse(e) => MedDbError::ParseError(e.to_string()),
            CatalogError::Storage(e) => MedDbError::StorageError(e.to_string()),
        }
    }
}

impl From<storage::StorageError> for MedDbError {
    fn from(e: storage::StorageError) -> Self {
        MedDbError::StorageError(e.to_string())
    }
}

impl From<serde_json::Error> for MedDbError {
    fn from(e: serde_json::Error) -> Self {
        MedDbError::ParseError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MedDbError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MedDbError::StorageError(format!("Lock poisoned: {}", e))
    }
}

type SharedStore = CatalogStore<Box<dyn KeyValueStore + Send>>;

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a catalog database at the given path.
///
/// `config_json` may be empty for defaults.
#[uniffi::export]
pub fn open_catalog(path: String, config_json: String) -> Result<Arc<MedDbCore>, MedDbError> {
    let config = CatalogConfig::from_json(&config_json)?;
    let backend: Box<dyn KeyValueStore + Send> = Box::new(SqliteStore::open(&path)?);
    MedDbCore::with_backend(backend, config)
}

/// Create an in-memory catalog (for testing).
#[uniffi::export]
pub fn open_catalog_in_memory() -> Result<Arc<MedDbCore>, MedDbError> {
    let backend: Box<dyn KeyValueStore + Send> = Box::new(SqliteStore::open_in_memory()?);
    MedDbCore::with_backend(backend, CatalogConfig::default())
}

/// Suggested file name for today's export.
#[uniffi::export]
pub fn backup_file_name() -> String {
    storage::dated_backup_file_name(chrono::Local::now().date_naive())
}

/// Detail sections shown on the medicine screen, in order.
#[uniffi::export]
pub fn displayed_detail_sections() -> Vec<FfiDetailSection> {
    DetailSection::DISPLAYED
        .into_iter()
        .map(|s| FfiDetailSection {
            key: s.key().to_string(),
            title: s.title().to_string(),
        })
        .collect()
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe catalog wrapper for FFI.
#[derive(uniffi::Object)]
pub struct MedDbCore {
    store: Arc<Mutex<SharedStore>>,
}

impl MedDbCore {
    fn with_backend(
        backend: Box<dyn KeyValueStore + Send>,
        config: CatalogConfig,
    ) -> Result<Arc<Self>, MedDbError> {
        let store = CatalogStore::open(backend, config)?;
        Ok(Arc::new(Self {
            store: Arc::new(Mutex::new(store)),
        }))
    }
}

fn to_ffi(list: Vec<Medicine>) -> Vec<FfiMedicine> {
    list.into_iter().map(|m| m.into()).collect()
}

fn key_names(keys: Vec<SnapshotKey>) -> Vec<String> {
    keys.into_iter().map(|k| k.as_str().to_string()).collect()
}

#[uniffi::export]
impl MedDbCore {
    // =========================================================================
    // Views
    // =========================================================================

    /// Medicines for a category tab and search text.
    pub fn get_active_view(
        &self,
        category: String,
        query: String,
    ) -> Result<Vec<FfiMedicine>, MedDbError> {
        let store = self.store.lock()?;
        Ok(to_ffi(store.view(&category, &query)))
    }

    /// Get an active medicine by ID.
    pub fn get_medicine(&self, id: String) -> Result<Option<FfiMedicine>, MedDbError> {
        let store = self.store.lock()?;
        Ok(store.get(&id).cloned().map(|m| m.into()))
    }

    /// Text of one detail section (e.g. "adultDose") of a medicine.
    pub fn detail_text(&self, id: String, section: String) -> Result<Option<String>, MedDbError> {
        let store = self.store.lock()?;
        let section = DetailSection::from_key(&section)
            .ok_or_else(|| MedDbError::Validation(format!("unknown section: {}", section)))?;
        Ok(store
            .get(&id)
            .and_then(|m| m.detail(section))
            .map(str::to_string))
    }

    pub fn get_categories(&self) -> Result<Vec<String>, MedDbError> {
        let store = self.store.lock()?;
        Ok(store.categories().to_vec())
    }

    /// Tab selected on launch.
    pub fn get_default_category(&self) -> Result<String, MedDbError> {
        let store = self.store.lock()?;
        Ok(store.default_category().to_string())
    }

    pub fn get_recycle_bin(&self) -> Result<Vec<FfiMedicine>, MedDbError> {
        let store = self.store.lock()?;
        Ok(to_ffi(store.recycle_bin().to_vec()))
    }

    /// Other strengths/forms of the same brand.
    pub fn get_variants(&self, id: String) -> Result<Vec<FfiMedicine>, MedDbError> {
        let store = self.store.lock()?;
        Ok(to_ffi(store.variants(&id)))
    }

    /// Recently added medicines, newest first.
    pub fn get_recent(&self) -> Result<Vec<FfiMedicine>, MedDbError> {
        let store = self.store.lock()?;
        Ok(to_ffi(store.recent()))
    }

    /// Filter the active list by brand or code (management screen).
    pub fn search_entries(&self, text: String) -> Result<Vec<FfiMedicine>, MedDbError> {
        let store = self.store.lock()?;
        Ok(to_ffi(catalog::query::filter_entries(store.medicines(), &text)))
    }

    /// Filter the recycle bin by brand or code.
    pub fn search_recycle_bin(&self, text: String) -> Result<Vec<FfiMedicine>, MedDbError> {
        let store = self.store.lock()?;
        Ok(to_ffi(catalog::query::filter_entries(store.recycle_bin(), &text)))
    }

    // =========================================================================
    // Medicine Operations
    // =========================================================================

    pub fn add_medicine(&self, input: FfiMedicineInput) -> Result<FfiMedicine, MedDbError> {
        let mut store = self.store.lock()?;
        Ok(store.add_medicine(input.into())?.into())
    }

    pub fn update_medicine(
        &self,
        id: String,
        input: FfiMedicineInput,
    ) -> Result<FfiMedicine, MedDbError> {
        let mut store = self.store.lock()?;
        Ok(store.update_medicine(&id, input.into())?.into())
    }

    /// Live duplicate check for the edit form.
    pub fn is_code_taken(&self, code: String, except_id: Option<String>) -> Result<bool, MedDbError> {
        let store = self.store.lock()?;
        Ok(store.is_code_taken(&code, except_id.as_deref()))
    }

    /// Prefilled form values for editing.
    pub fn edit_form(&self, id: String) -> Result<Option<FfiMedicineInput>, MedDbError> {
        let store = self.store.lock()?;
        Ok(store.edit_form(&id).map(|i| i.into()))
    }

    /// Move to the recycle bin. `false` if not found.
    pub fn soft_delete(&self, id: String) -> Result<bool, MedDbError> {
        let mut store = self.store.lock()?;
        Ok(store.soft_delete(&id)?)
    }

    /// Bring back from the recycle bin. `false` if not found.
    pub fn restore(&self, id: String) -> Result<bool, MedDbError> {
        let mut store = self.store.lock()?;
        Ok(store.restore(&id)?)
    }

    /// Delete forever from the recycle bin. `false` if not found.
    pub fn purge(&self, id: String) -> Result<bool, MedDbError> {
        let mut store = self.store.lock()?;
        Ok(store.purge(&id)?)
    }

    // =========================================================================
    // Category Operations
    // =========================================================================

    pub fn add_category(&self, name: String) -> Result<(), MedDbError> {
        let mut store = self.store.lock()?;
        Ok(store.add_category(&name)?)
    }

    pub fn remove_category(&self, name: String) -> Result<bool, MedDbError> {
        let mut store = self.store.lock()?;
        Ok(store.remove_category(&name)?)
    }

    // =========================================================================
    // Backup Operations
    // =========================================================================

    /// Export the whole catalog as JSON.
    pub fn export_snapshot(&self) -> Result<String, MedDbError> {
        let store = self.store.lock()?;
        Ok(store.export_snapshot().to_json()?)
    }

    /// Restore from backup JSON. Returns the keys that were applied.
    pub fn import_snapshot(&self, json: String) -> Result<Vec<String>, MedDbError> {
        let mut flow = RestoreFlow::new();
        flow.parse(&json)?;
        let mut store = self.store.lock()?;
        Ok(key_names(flow.apply(&mut *store)?))
    }

    /// Write a backup file.
    pub fn backup_to_file(&self, path: String) -> Result<(), MedDbError> {
        let store = self.store.lock()?;
        Ok(backup::backup_to_file(&*store, Path::new(&path))?)
    }

    /// Read and apply a backup file. Returns the keys that were applied.
    pub fn restore_from_file(&self, path: String) -> Result<Vec<String>, MedDbError> {
        let mut flow = RestoreFlow::new();
        flow.read_file(Path::new(&path))?;
        let mut store = self.store.lock()?;
        Ok(key_names(flow.apply(&mut *store)?))
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe medicine.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicine {
    pub id: String,
    pub code_name: String,
    pub full_name: String,
    pub category: String,
    pub description: Option<String>,
    pub added_at: i64,
    pub dosage: Option<String>,
    pub form: Option<String>,
    pub generic_name: Option<String>,
    pub manufacturer: Option<String>,
    pub unit_price: Option<String>,
    pub available_forms: Vec<String>,
    pub details: Option<FfiMedicineDetails>,
}

impl From<Medicine> for FfiMedicine {
    fn from(med: Medicine) -> Self {
        Self {
            id: med.id,
            code_name: med.code_name,
            full_name: med.full_name,
            category: med.category,
            description: med.description,
            added_at: med.added_at,
            dosage: med.dosage,
            form: med.form,
            generic_name: med.generic_name,
            manufacturer: med.manufacturer,
            unit_price: med.unit_price,
            available_forms: med.available_forms.unwrap_or_default(),
            details: med.details.map(|d| d.into()),
        }
    }
}

/// FFI-safe detail sections.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicineDetails {
    pub indications: Option<String>,
    pub adult_dose: Option<String>,
    pub child_dose: Option<String>,
    pub renal_dose: Option<String>,
    pub administration: Option<String>,
    pub contraindications: Option<String>,
    pub side_effects: Option<String>,
    pub precautions: Option<String>,
    pub pregnancy: Option<String>,
    pub therapeutic_class: Option<String>,
    pub mode_of_action: Option<String>,
    pub interaction: Option<String>,
    pub pack_size: Option<String>,
}

impl From<MedicineDetails> for FfiMedicineDetails {
    fn from(d: MedicineDetails) -> Self {
        Self {
            indications: d.indications,
            adult_dose: d.adult_dose,
            child_dose: d.child_dose,
            renal_dose: d.renal_dose,
            administration: d.administration,
            contraindications: d.contraindications,
            side_effects: d.side_effects,
            precautions: d.precautions,
            pregnancy: d.pregnancy,
            therapeutic_class: d.therapeutic_class,
            mode_of_action: d.mode_of_action,
            interaction: d.interaction,
            pack_size: d.pack_size,
        }
    }
}

/// FFI-safe add/edit form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicineInput {
    pub code_name: String,
    pub full_name: String,
    pub category: String,
    pub generic_name: String,
    pub dosage: String,
    pub form: String,
    pub unit_price: String,
    pub pack_size: String,
}

impl From<FfiMedicineInput> for MedicineInput {
    fn from(input: FfiMedicineInput) -> Self {
        MedicineInput {
            code_name: input.code_name,
            full_name: input.full_name,
            category: input.category,
            generic_name: input.generic_name,
            dosage: input.dosage,
            form: input.form,
            unit_price: input.unit_price,
            pack_size: input.pack_size,
        }
    }
}

impl From<MedicineInput> for FfiMedicineInput {
    fn from(input: MedicineInput) -> Self {
        Self {
            code_name: input.code_name,
            full_name: input.full_name,
            category: input.category,
            generic_name: input.generic_name,
            dosage: input.dosage,
            form: input.form,
            unit_price: input.unit_price,
            pack_size: input.pack_size,
        }
    }
}

/// FFI-safe detail section descriptor.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDetailSection {
    pub key: String,
    pub title: String,
}
