use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::{KeyValueStore, StorageError, StorageResult};

/// In-memory record store for testing.
///
/// Uses `RefCell` for interior mutability since the catalog has a single
/// writer; `KeyValueStore` takes `&self` for both reads and writes.
#[derive(Default)]
pub struct MemoryStore {
    records: RefCell<HashMap<String, serde_json::Value>>,
    simulate_write_error: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful saves so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Raw stored value, bypassing the trait.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.records.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> StorageResult<Option<serde_json::Value>> {
        Ok(self.records.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> StorageResult<()> {
        if self.simulate_write_error.get() {
            return Err(StorageError::Unavailable("Simulated write error".to_string()));
        }
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
