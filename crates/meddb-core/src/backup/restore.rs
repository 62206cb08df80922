//! Restore flow: read a backup, parse it, apply it.
//!
//! ```text
//! Idle → Reading → Parsed → Applied
//!           │
//!           └────────→ Rejected   (unreadable or malformed; store untouched)
//! ```

use std::path::Path;

use tracing::{debug, info, warn};

use super::{deserialize, SnapshotKey, SnapshotPatch};
use crate::catalog::{CatalogError, CatalogResult, CatalogStore};
use crate::storage::{read_backup_file, write_backup_file, KeyValueStore};

/// Where a restore currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestorePhase {
    Idle,
    Reading,
    Parsed,
    Applied,
    Rejected,
}

/// One restore attempt.
#[derive(Debug)]
pub struct RestoreFlow {
    phase: RestorePhase,
    patch: Option<SnapshotPatch>,
}

impl Default for RestoreFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl RestoreFlow {
    pub fn new() -> Self {
        Self {
            phase: RestorePhase::Idle,
            patch: None,
        }
    }

    pub fn phase(&self) -> RestorePhase {
        self.phase
    }

    /// The parsed backup, once in [`RestorePhase::Parsed`].
    pub fn patch(&self) -> Option<&SnapshotPatch> {
        self.patch.as_ref()
    }

    /// Read and parse a backup file.
    pub fn read_file(&mut self, path: &Path) -> CatalogResult<()> {
        self.transition(RestorePhase::Reading);
        match read_backup_file(path) {
            Ok(text) => self.parse(&text),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "backup file unreadable");
                self.transition(RestorePhase::Rejected);
                Err(e.into())
            }
        }
    }

    /// Parse backup text already in hand.
    pub fn parse(&mut self, text: &str) -> CatalogResult<()> {
        if self.phase == RestorePhase::Idle {
            self.transition(RestorePhase::Reading);
        }
        match deserialize(text) {
            Ok(patch) => {
                self.patch = Some(patch);
                self.transition(RestorePhase::Parsed);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "backup rejected");
                self.transition(RestorePhase::Rejected);
                Err(CatalogError::Parse(e))
            }
        }
    }

    /// Apply the parsed backup to `store`.
    ///
    /// A storage failure part-way leaves the flow in `Parsed` with the
    /// patch kept, so `apply` can be retried. Keys written before the
    /// failure are already applied.
    pub fn apply<S: KeyValueStore>(
        &mut self,
        store: &mut CatalogStore<S>,
    ) -> CatalogResult<Vec<SnapshotKey>> {
        let patch = match (self.phase, &self.patch) {
            (RestorePhase::Parsed, Some(patch)) => patch.clone(),
            _ => {
                return Err(CatalogError::Validation(format!(
                    "cannot apply a restore in phase {:?}",
                    self.phase
                )))
            }
        };

        let applied = store.import_snapshot(patch)?;
        self.patch = None;
        self.transition(RestorePhase::Applied);
        Ok(applied)
    }

    fn transition(&mut self, next: RestorePhase) {
        debug!(from = ?self.phase, to = ?next, "restore phase");
        self.phase = next;
    }
}

/// Write a snapshot of `store` to `path` as pretty-printed JSON.
pub fn backup_to_file<S: KeyValueStore>(store: &CatalogStore<S>, path: &Path) -> CatalogResult<()> {
    let json = store
        .export_snapshot()
        .to_json()
        .map_err(crate::storage::StorageError::from)?;
    write_backup_file(path, &json)?;
    info!(path = %path.display(), bytes = json.len(), "backup written");
    Ok(())
}

/// Read, parse and apply the backup at `path`.
pub fn restore_from_file<S: KeyValueStore>(
    store: &mut CatalogStore<S>,
    path: &Path,
) -> CatalogResult<Vec<SnapshotKey>> {
    let mut flow = RestoreFlow::new();
    flow.read_file(path)?;
    flow.apply(store)
}
