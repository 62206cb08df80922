//! Catalog integration tests.
//!
//! Exercise the store end to end against both record backends.

use meddb_core::backup::{self, RestoreFlow, RestorePhase, SnapshotKey};
use meddb_core::storage::{CATEGORIES_KEY, MEDICINES_KEY, RECYCLE_BIN_KEY};
use meddb_core::{
    CatalogConfig, CatalogError, CatalogStore, KeyValueStore, MedicineInput, MemoryStore,
    SqliteStore,
};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn store_with(
    medicines: serde_json::Value,
    recycle_bin: serde_json::Value,
) -> CatalogStore<MemoryStore> {
    init_tracing();
    let backend = MemoryStore::new();
    backend.save(MEDICINES_KEY, &medicines).unwrap();
    backend.save(RECYCLE_BIN_KEY, &recycle_bin).unwrap();
    CatalogStore::open(backend, CatalogConfig::default()).unwrap()
}

#[test]
fn test_duplicate_code_rejected_case_insensitively() {
    let mut store = store_with(
        json!([{"id": "m1", "codeName": "AB1", "fullName": "FOO", "category": "Brand", "addedAt": 100}]),
        json!([]),
    );

    let err = store
        .add_medicine(MedicineInput::new("ab1", "BAR").with_category("Brand"))
        .unwrap_err();

    assert!(matches!(err, CatalogError::DuplicateCode(ref code) if code == "AB1"));
    assert_eq!(store.medicines().len(), 1);
    assert_eq!(store.medicines()[0].id, "m1");
}

#[test]
fn test_restore_into_empty_active_list() {
    let mut store = store_with(
        json!([]),
        json!([{"id": "r1", "codeName": "R1", "fullName": "RESTORED", "category": "Cardiac", "addedAt": 5}]),
    );

    assert!(store.restore("r1").unwrap());

    assert_eq!(store.medicines().len(), 1);
    assert_eq!(store.medicines()[0].id, "r1");
    assert_eq!(store.medicines()[0].full_name, "RESTORED");
    assert!(store.recycle_bin().is_empty());
}

#[test]
fn test_view_of_empty_catalog() {
    let store = store_with(json!([]), json!([]));
    assert!(store.view("Brand", "ab").is_empty());
}

#[test]
fn test_full_lifecycle_on_sqlite() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meddb.sqlite");

    let id = {
        let mut store =
            CatalogStore::open(SqliteStore::open(&path).unwrap(), CatalogConfig::empty()).unwrap();
        let mut input = MedicineInput::new("nap", "NAPA 500MG").with_category("Antibiotics");
        input.unit_price = "1.20".into();
        let med = store.add_medicine(input).unwrap();
        store.add_category("Pain").unwrap();
        store.soft_delete(&med.id).unwrap();
        med.id
    };

    let mut store =
        CatalogStore::open(SqliteStore::open(&path).unwrap(), CatalogConfig::empty()).unwrap();
    assert!(store.medicines().is_empty());
    assert_eq!(store.recycle_bin()[0].id, id);
    assert_eq!(store.recycle_bin()[0].unit_price.as_deref(), Some("1.20 BDT"));
    assert_eq!(store.categories().last().map(String::as_str), Some("Pain"));

    store.restore(&id).unwrap();
    let reopened =
        CatalogStore::open(SqliteStore::open(&path).unwrap(), CatalogConfig::empty()).unwrap();
    assert_eq!(reopened.get(&id).unwrap().code_name, "NAP");
    assert!(reopened.recycle_bin().is_empty());
}

#[test]
fn test_backup_round_trip_into_empty_store() {
    init_tracing();
    let mut source = CatalogStore::open(MemoryStore::new(), CatalogConfig::default()).unwrap();
    source.add_category("Pain").unwrap();
    source.remove_category("Vitamins").unwrap();
    let victim = source.medicines()[2].id.clone();
    source.soft_delete(&victim).unwrap();

    let text = source.export_snapshot().to_json().unwrap();

    let mut target = CatalogStore::open(MemoryStore::new(), CatalogConfig::empty()).unwrap();
    let mut flow = RestoreFlow::new();
    flow.parse(&text).unwrap();
    flow.apply(&mut target).unwrap();

    assert_eq!(flow.phase(), RestorePhase::Applied);
    assert_eq!(target.medicines(), source.medicines());
    assert_eq!(target.categories(), source.categories());
    assert_eq!(target.recycle_bin(), source.recycle_bin());

    // Persisted, not just in memory
    let backend = target.backend();
    assert_eq!(
        backend.get(MEDICINES_KEY).unwrap(),
        serde_json::to_value(source.medicines()).unwrap()
    );
    assert_eq!(
        backend.get(CATEGORIES_KEY).unwrap(),
        serde_json::to_value(source.categories()).unwrap()
    );
}

#[test]
fn test_partial_restore_only_touches_categories() {
    init_tracing();
    let mut store = CatalogStore::open(MemoryStore::new(), CatalogConfig::default()).unwrap();
    let first = store.medicines()[0].id.clone();
    store.soft_delete(&first).unwrap();
    let medicines = store.medicines().to_vec();
    let bin = store.recycle_bin().to_vec();

    let patch = backup::deserialize(r#"{"categories": ["Code", "Brand", "Generic", "Pain"]}"#)
        .unwrap();
    let applied = store.import_snapshot(patch).unwrap();

    assert_eq!(applied, vec![SnapshotKey::Categories]);
    assert_eq!(store.categories().len(), 4);
    assert_eq!(store.medicines(), medicines.as_slice());
    assert_eq!(store.recycle_bin(), bin.as_slice());
}

#[test]
fn test_rejected_backup_leaves_store_untouched() {
    init_tracing();
    let mut store = CatalogStore::open(MemoryStore::new(), CatalogConfig::default()).unwrap();
    let before = store.export_snapshot();

    let mut flow = RestoreFlow::new();
    assert!(flow.parse(r#"{"medicines": [{"id": "x"}], "categories": 5}"#).is_err());
    assert_eq!(flow.phase(), RestorePhase::Rejected);
    assert!(flow.apply(&mut store).is_err());

    assert_eq!(store.medicines(), before.medicines.as_slice());
    assert_eq!(store.categories(), before.categories.as_slice());
}

#[test]
fn test_category_tab_views() {
    init_tracing();
    let mut store = CatalogStore::open(MemoryStore::new(), CatalogConfig::empty()).unwrap();
    for (code, name, category) in [
        ("C2", "CARDIO B", "Cardiac"),
        ("A1", "ANTI A", "Antibiotics"),
        ("C1", "CARDIO A", "Cardiac"),
    ] {
        store
            .add_medicine(MedicineInput::new(code, name).with_category(category))
            .unwrap();
    }

    let codes = |list: Vec<meddb_core::Medicine>| {
        list.into_iter().map(|m| m.code_name).collect::<Vec<_>>()
    };

    assert_eq!(codes(store.view("Code", "")), vec!["A1", "C1", "C2"]);
    assert_eq!(codes(store.view("Brand", "cardio")), vec!["C1", "C2"]);
    // Newest first within a real category
    assert_eq!(codes(store.view("Cardiac", "")), vec!["C1", "C2"]);
    assert!(store.view("Cardiac", "c").is_empty());
}
