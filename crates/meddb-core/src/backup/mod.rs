//! JSON backup and restore of the whole catalog.
//!
//! The envelope has no version field; it is the literal shape of the three
//! collections plus a timestamp:
//!
//! ```text
//! {
//!   "medicines":  [Medicine, ...],
//!   "categories": ["Code", "Brand", ...],
//!   "recycleBin": [Medicine, ...],
//!   "timestamp":  "2024-06-10T08:00:00+00:00" | 1718006400000
//! }
//! ```
//!
//! All four keys are written on export; each is optional on restore.

mod envelope;
mod restore;

pub use envelope::*;
pub use restore::*;

use thiserror::Error;

/// Backup parsing errors.
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unexpected shape for \"{key}\": {reason}")]
    Shape { key: &'static str, reason: String },
}

pub type BackupResult<T> = Result<T, BackupError>;
