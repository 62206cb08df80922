//! Whole-catalog export and import.

use tracing::info;

use super::{CatalogResult, CatalogStore};
use crate::backup::{self, Snapshot, SnapshotKey, SnapshotPatch};
use crate::storage::KeyValueStore;

impl<S: KeyValueStore> CatalogStore<S> {
    /// Snapshot of all three collections.
    pub fn export_snapshot(&self) -> Snapshot {
        backup::serialize(&self.medicines, &self.categories, &self.recycle_bin)
    }

    /// Replace each collection present in `patch` and persist it.
    ///
    /// Keys are applied in order medicines, categories, recycle bin. If a
    /// later write fails, earlier keys stay applied. Returns the keys that
    /// were applied.
    pub fn import_snapshot(&mut self, patch: SnapshotPatch) -> CatalogResult<Vec<SnapshotKey>> {
        let mut applied = Vec::new();

        if let Some(medicines) = patch.medicines {
            self.medicines = medicines;
            self.persist_medicines()?;
            applied.push(SnapshotKey::Medicines);
        }
        if let Some(categories) = patch.categories {
            self.categories = categories;
            self.persist_categories()?;
            applied.push(SnapshotKey::Categories);
        }
        if let Some(recycle_bin) = patch.recycle_bin {
            self.recycle_bin = recycle_bin;
            self.persist_recycle_bin()?;
            applied.push(SnapshotKey::RecycleBin);
        }

        info!(
            keys = ?applied.iter().map(|k| k.as_str()).collect::<Vec<_>>(),
            medicines = self.medicines.len(),
            recycle_bin = self.recycle_bin.len(),
            "snapshot imported"
        );
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use crate::models::MedicineInput;
    use crate::storage::{MemoryStore, CATEGORIES_KEY};

    fn populated() -> CatalogStore<MemoryStore> {
        let mut store = CatalogStore::open(MemoryStore::new(), CatalogConfig::empty()).unwrap();
        store
            .add_medicine(MedicineInput::new("A1", "ALPHA").with_category("Cardiac"))
            .unwrap();
        let gone = store
            .add_medicine(MedicineInput::new("B1", "BETA").with_category("Cardiac"))
            .unwrap();
        store.soft_delete(&gone.id).unwrap();
        store
    }

    #[test]
    fn test_export_then_import_into_empty_store() {
        let source = populated();
        let text = source.export_snapshot().to_json().unwrap();

        let mut target = CatalogStore::open(MemoryStore::new(), CatalogConfig::empty()).unwrap();
        target.add_category("Extra").unwrap();
        let applied = target
            .import_snapshot(backup::deserialize(&text).unwrap())
            .unwrap();

        assert_eq!(
            applied,
            vec![SnapshotKey::Medicines, SnapshotKey::Categories, SnapshotKey::RecycleBin]
        );
        assert_eq!(target.medicines(), source.medicines());
        assert_eq!(target.categories(), source.categories());
        assert_eq!(target.recycle_bin(), source.recycle_bin());
    }

    #[test]
    fn test_partial_import_touches_only_present_keys() {
        let mut store = populated();
        let medicines = store.medicines().to_vec();
        let bin = store.recycle_bin().to_vec();

        let patch = backup::deserialize(r#"{"categories": ["Code", "Pain"]}"#).unwrap();
        let applied = store.import_snapshot(patch).unwrap();

        assert_eq!(applied, vec![SnapshotKey::Categories]);
        assert_eq!(store.categories(), &["Code", "Pain"]);
        assert_eq!(store.medicines(), medicines.as_slice());
        assert_eq!(store.recycle_bin(), bin.as_slice());
        assert_eq!(
            store.backend().get(CATEGORIES_KEY),
            Some(serde_json::json!(["Code", "Pain"]))
        );
    }

    #[test]
    fn test_import_failure_keeps_earlier_keys() {
        let mut store = populated();
        store.backend().set_simulate_write_error(true);

        let patch = backup::deserialize(r#"{"medicines": [], "categories": []}"#).unwrap();
        assert!(store.import_snapshot(patch).is_err());

        // Applied in memory before the failed write; nothing after it
        assert!(store.medicines().is_empty());
        assert_eq!(store.categories().len(), 7);
    }
}
