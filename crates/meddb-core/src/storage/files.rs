//! Backup file I/O.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use super::{StorageError, StorageResult};

/// File name used for the one-tap backup into the device's documents folder.
pub const DEVICE_BACKUP_FILE: &str = "dil_medicine_backup.json";

/// Dated export file name, e.g. `MedDB_Backup_2024-03-01.json`.
pub fn dated_backup_file_name(date: NaiveDate) -> String {
    format!("MedDB_Backup_{}.json", date.format("%Y-%m-%d"))
}

/// Write backup content to `path`.
///
/// Writes to a sibling `.tmp` file, then renames it over `path`.
pub fn write_backup_file(path: &Path, content: &str) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Read backup content from `path`.
pub fn read_backup_file(path: &Path) -> StorageResult<String> {
    fs::read_to_string(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })
}
