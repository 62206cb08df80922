//! Category tab maintenance.

use tracing::{debug, info};

use super::{CatalogResult, CatalogStore};
use crate::models::is_protected;
use crate::storage::KeyValueStore;

impl<S: KeyValueStore> CatalogStore<S> {
    /// Append a category tab. Names are kept verbatim, duplicates allowed.
    pub fn add_category(&mut self, name: &str) -> CatalogResult<()> {
        self.categories.push(name.to_string());
        self.persist_categories()?;
        info!(name, "category added");
        Ok(())
    }

    /// Remove every tab named exactly `name`.
    ///
    /// `Code`, `Brand` and `Generic` are never removed. Medicines filed
    /// under a removed tab keep their category. Returns whether anything
    /// was removed.
    pub fn remove_category(&mut self, name: &str) -> CatalogResult<bool> {
        if is_protected(name) {
            debug!(name, "ignoring removal of built-in category");
            return Ok(false);
        }

        let before = self.categories.len();
        self.categories.retain(|c| c != name);
        if self.categories.len() == before {
            debug!(name, "remove category: not found");
            return Ok(false);
        }

        self.persist_categories()?;
        info!(name, "category removed");
        Ok(true)
    }
}
