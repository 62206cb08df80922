//! Backup envelope encoding.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{BackupError, BackupResult};
use crate::models::{Category, Medicine};

/// Top-level key of a backup envelope that restore can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKey {
    Medicines,
    Categories,
    RecycleBin,
}

impl SnapshotKey {
    /// JSON key in the envelope.
    pub fn as_str(self) -> &'static str {
        match self {
            SnapshotKey::Medicines => "medicines",
            SnapshotKey::Categories => "categories",
            SnapshotKey::RecycleBin => "recycleBin",
        }
    }
}

/// When a snapshot was taken.
///
/// Older backups stored epoch milliseconds, newer ones an RFC 3339 string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SnapshotTimestamp {
    Millis(i64),
    Text(String),
}

/// A complete export of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub medicines: Vec<Medicine>,
    pub categories: Vec<Category>,
    pub recycle_bin: Vec<Medicine>,
    pub timestamp: SnapshotTimestamp,
}

impl Snapshot {
    /// Export to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The parts of a backup that were present and can be applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotPatch {
    pub medicines: Option<Vec<Medicine>>,
    pub categories: Option<Vec<Category>>,
    pub recycle_bin: Option<Vec<Medicine>>,
    pub timestamp: Option<SnapshotTimestamp>,
}

impl SnapshotPatch {
    /// Keys present in the patch, in apply order.
    pub fn keys(&self) -> Vec<SnapshotKey> {
        let mut keys = Vec::new();
        if self.medicines.is_some() {
            keys.push(SnapshotKey::Medicines);
        }
        if self.categories.is_some() {
            keys.push(SnapshotKey::Categories);
        }
        if self.recycle_bin.is_some() {
            keys.push(SnapshotKey::RecycleBin);
        }
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }
}

impl From<Snapshot> for SnapshotPatch {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            medicines: Some(snapshot.medicines),
            categories: Some(snapshot.categories),
            recycle_bin: Some(snapshot.recycle_bin),
            timestamp: Some(snapshot.timestamp),
        }
    }
}

/// Build a snapshot of the three collections, stamped with the current time.
pub fn serialize(
    medicines: &[Medicine],
    categories: &[Category],
    recycle_bin: &[Medicine],
) -> Snapshot {
    Snapshot {
        medicines: medicines.to_vec(),
        categories: categories.to_vec(),
        recycle_bin: recycle_bin.to_vec(),
        timestamp: SnapshotTimestamp::Text(chrono::Utc::now().to_rfc3339()),
    }
}

/// Parse backup text into a patch.
///
/// Fails only when the text is not JSON or a present collection has the
/// wrong shape. Missing or `null` keys are simply absent from the patch,
/// and a non-object document yields an empty patch.
pub fn deserialize(text: &str) -> BackupResult<SnapshotPatch> {
    let root: Value = serde_json::from_str(text)?;
    decode_patch(root)
}

/// Decode an already-parsed JSON document into a patch.
fn decode_patch(root: Value) -> BackupResult<SnapshotPatch> {
    let Value::Object(mut map) = root else {
        return Ok(SnapshotPatch::default());
    };

    Ok(SnapshotPatch {
        medicines: take_medicines(&mut map, SnapshotKey::Medicines)?,
        categories: take_categories(&mut map)?,
        recycle_bin: take_medicines(&mut map, SnapshotKey::RecycleBin)?,
        timestamp: take_timestamp(&mut map),
    })
}

fn take_array(map: &mut Map<String, Value>, key: SnapshotKey) -> BackupResult<Option<Vec<Value>>> {
    match map.remove(key.as_str()) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(BackupError::Shape {
            key: key.as_str(),
            reason: "expected an array".to_string(),
        }),
    }
}

fn take_medicines(
    map: &mut Map<String, Value>,
    key: SnapshotKey,
) -> BackupResult<Option<Vec<Medicine>>> {
    let Some(items) = take_array(map, key)? else {
        return Ok(None);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            if !item.is_object() {
                return Err(BackupError::Shape {
                    key: key.as_str(),
                    reason: format!("entry {} is not an object", i),
                });
            }
            serde_json::from_value(item).map_err(|e| BackupError::Shape {
                key: key.as_str(),
                reason: format!("entry {}: {}", i, e),
            })
        })
        .collect::<BackupResult<Vec<_>>>()
        .map(Some)
}

fn take_categories(map: &mut Map<String, Value>) -> BackupResult<Option<Vec<Category>>> {
    let key = SnapshotKey::Categories;
    let Some(items) = take_array(map, key)? else {
        return Ok(None);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) => Ok(s),
            _ => Err(BackupError::Shape {
                key: key.as_str(),
                reason: format!("entry {} is not a string", i),
            }),
        })
        .collect::<BackupResult<Vec<_>>>()
        .map(Some)
}

fn take_timestamp(map: &mut Map<String, Value>) -> Option<SnapshotTimestamp> {
    match map.remove("timestamp")? {
        Value::String(s) => Some(SnapshotTimestamp::Text(s)),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(SnapshotTimestamp::Millis),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn med(id: &str, code: &str) -> Medicine {
        Medicine {
            id: id.into(),
            code_name: code.into(),
            full_name: format!("{} TABLET", code),
            category: "Cardiac".into(),
            added_at: 100,
            ..Default::default()
        }
    }

    #[test]
    fn test_serialize_writes_all_keys() {
        let snapshot = serialize(&[med("m1", "AB1")], &["Code".to_string()], &[]);
        let json: Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();

        assert!(json["medicines"].is_array());
        assert!(json["categories"].is_array());
        assert_eq!(json["recycleBin"], Value::Array(vec![]));
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_round_trip() {
        let active = vec![med("m1", "AB1"), med("m2", "CD2")];
        let categories = vec!["Code".to_string(), "Cardiac".to_string()];
        let bin = vec![med("r1", "EF3")];

        let text = serialize(&active, &categories, &bin).to_json().unwrap();
        let patch = deserialize(&text).unwrap();

        assert_eq!(patch.medicines, Some(active));
        assert_eq!(patch.categories, Some(categories));
        assert_eq!(patch.recycle_bin, Some(bin));
        assert!(matches!(patch.timestamp, Some(SnapshotTimestamp::Text(_))));
    }

    #[test]
    fn test_malformed_text_is_rejected() {
        let err = deserialize("{ not json").unwrap_err();
        assert!(matches!(err, BackupError::Malformed(_)));
    }

    #[test]
    fn test_missing_keys_are_absent() {
        let patch = deserialize(r#"{"categories": ["Code", "Pain"]}"#).unwrap();
        assert_eq!(patch.keys(), vec![SnapshotKey::Categories]);
        assert!(patch.medicines.is_none());
        assert!(patch.recycle_bin.is_none());
    }

    #[test]
    fn test_null_key_is_absent() {
        let patch = deserialize(r#"{"medicines": null, "timestamp": 1700000000000}"#).unwrap();
        assert!(patch.is_empty());
        assert_eq!(patch.timestamp, Some(SnapshotTimestamp::Millis(1_700_000_000_000)));
    }

    #[test]
    fn test_non_object_document_is_empty_patch() {
        assert!(deserialize("42").unwrap().is_empty());
        assert!(deserialize("[1, 2]").unwrap().is_empty());
    }

    #[test]
    fn test_wrong_collection_shape_is_rejected() {
        let err = deserialize(r#"{"medicines": "oops"}"#).unwrap_err();
        assert!(matches!(err, BackupError::Shape { key: "medicines", .. }));

        let err = deserialize(r#"{"categories": ["Code", 7]}"#).unwrap_err();
        assert!(matches!(err, BackupError::Shape { key: "categories", .. }));

        let err = deserialize(r#"{"recycleBin": [1]}"#).unwrap_err();
        assert!(matches!(err, BackupError::Shape { key: "recycleBin", .. }));
    }

    #[test]
    fn test_sparse_entries_pass_through() {
        let patch = deserialize(r#"{"medicines": [{"id": "x"}, {"codeName": "Q1", "extra": true}]}"#)
            .unwrap();
        let meds = patch.medicines.unwrap();
        assert_eq!(meds.len(), 2);
        assert_eq!(meds[0].id, "x");
        assert_eq!(meds[0].code_name, "");
        assert_eq!(meds[1].code_name, "Q1");
    }

    #[test]
    fn test_reads_legacy_app_backup() {
        let text = r#"{
            "medicines": [{
                "id": "mazm", "codeName": "AZM", "fullName": "AZIMEX TABLET-500MG",
                "genericName": "Azithromycin", "category": "Antibiotics",
                "addedAt": 1718000000000, "dosage": "500mg", "type": "Tablet",
                "unitPrice": "35 BDT", "details": {"packSize": "6's"}
            }],
            "categories": ["Code", "Brand", "Generic", "Antibiotics"],
            "recycleBin": [],
            "timestamp": "2024-06-10T08:00:00.000Z"
        }"#;

        let patch = deserialize(text).unwrap();
        let meds = patch.medicines.as_ref().unwrap();
        assert_eq!(meds[0].form.as_deref(), Some("Tablet"));
        assert_eq!(meds[0].unit_price.as_deref(), Some("35 BDT"));
        assert_eq!(
            meds[0].details.as_ref().and_then(|d| d.pack_size.as_deref()),
            Some("6's")
        );
        assert_eq!(patch.keys().len(), 3);
    }

    #[test]
    fn test_wrong_typed_fields_do_not_reject_the_backup() {
        let text = r#"{
            "medicines": [
                {"id": "a", "codeName": "X1", "fullName": "Y", "category": null, "addedAt": 1},
                {"id": "b", "codeName": 123, "fullName": "Z", "dosage": 5, "type": [],
                 "availableForms": "tablet", "details": "none"}
            ],
            "categories": ["Code"]
        }"#;

        let patch = deserialize(text).unwrap();
        assert_eq!(patch.categories, Some(vec!["Code".to_string()]));

        let meds = patch.medicines.unwrap();
        assert_eq!(meds[0].category, "");
        assert_eq!(meds[0].code_name, "X1");
        assert_eq!(meds[1].code_name, "123");
        assert_eq!(meds[1].dosage.as_deref(), Some("5"));
        assert_eq!(meds[1].form, None);
        assert_eq!(meds[1].available_forms, None);
        assert_eq!(meds[1].details, None);
    }
}
