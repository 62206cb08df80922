//! Medicine lifecycle: add, edit, recycle bin.

use tracing::{debug, info, warn};

use super::{CatalogError, CatalogResult, CatalogStore};
use crate::config::RestorePolicy;
use crate::models::{
    canonical_code, non_empty, normalize_unit_price, strip_currency, Medicine, MedicineDetails,
    MedicineInput,
};
use crate::storage::KeyValueStore;

impl<S: KeyValueStore> CatalogStore<S> {
    /// Whether an active medicine other than `except_id` holds `code`
    /// (compared trimmed and upper-cased).
    pub fn is_code_taken(&self, code: &str, except_id: Option<&str>) -> bool {
        let code = canonical_code(code);
        self.medicines
            .iter()
            .any(|m| Some(m.id.as_str()) != except_id && m.has_code(&code))
    }

    /// Add a new medicine at the front of the active list.
    pub fn add_medicine(&mut self, input: MedicineInput) -> CatalogResult<Medicine> {
        let code = input.canonical_code();
        let full_name = input.full_name.trim().to_string();
        if code.is_empty() {
            return Err(CatalogError::Validation("code name is required".into()));
        }
        if full_name.is_empty() {
            return Err(CatalogError::Validation("brand name is required".into()));
        }
        if self.is_code_taken(&code, None) {
            warn!(code = %code, "add rejected: code already in use");
            return Err(CatalogError::DuplicateCode(code));
        }

        let mut medicine = Medicine::new(code, full_name, input.category.trim().to_string());
        medicine.generic_name = non_empty(&input.generic_name);
        medicine.dosage = non_empty(&input.dosage);
        medicine.form = non_empty(&input.form);
        medicine.unit_price = normalize_unit_price(&input.unit_price, &self.config.currency_suffix);
        medicine.details = non_empty(&input.pack_size).map(|pack_size| MedicineDetails {
            pack_size: Some(pack_size),
            ..Default::default()
        });

        self.medicines.insert(0, medicine.clone());
        self.persist_medicines()?;

        info!(id = %medicine.id, code = %medicine.code_name, "medicine added");
        Ok(medicine)
    }

    /// Edit an active medicine in place.
    ///
    /// Blank code, brand name or category keep the current value; all
    /// other fields take the input as-is, so blanks clear them. Detail
    /// sections other than pack size are kept.
    pub fn update_medicine(&mut self, id: &str, input: MedicineInput) -> CatalogResult<Medicine> {
        let index = self
            .medicines
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        let existing = &self.medicines[index];

        let code = match input.canonical_code() {
            c if c.is_empty() => existing.code_name.clone(),
            c => c,
        };
        if self.is_code_taken(&code, Some(id)) {
            warn!(id, code = %code, "update rejected: code already in use");
            return Err(CatalogError::DuplicateCode(code));
        }

        let mut details = existing.details.clone().unwrap_or_default();
        details.pack_size = non_empty(&input.pack_size);

        let updated = Medicine {
            code_name: code,
            full_name: non_empty(&input.full_name).unwrap_or_else(|| existing.full_name.clone()),
            category: non_empty(&input.category).unwrap_or_else(|| existing.category.clone()),
            generic_name: non_empty(&input.generic_name),
            dosage: non_empty(&input.dosage),
            form: non_empty(&input.form),
            unit_price: normalize_unit_price(&input.unit_price, &self.config.currency_suffix),
            details: (details != MedicineDetails::default()).then_some(details),
            ..existing.clone()
        };

        self.medicines[index] = updated.clone();
        self.persist_medicines()?;

        info!(id, code = %updated.code_name, "medicine updated");
        Ok(updated)
    }

    /// Move an active medicine to the front of the recycle bin.
    ///
    /// Returns `false` (and writes nothing) if `id` is not active.
    pub fn soft_delete(&mut self, id: &str) -> CatalogResult<bool> {
        let Some(index) = self.medicines.iter().position(|m| m.id == id) else {
            debug!(id, "soft delete: not in active list");
            return Ok(false);
        };

        let medicine = self.medicines.remove(index);
        self.recycle_bin.insert(0, medicine);
        self.persist_medicines()?;
        self.persist_recycle_bin()?;

        info!(id, "medicine moved to recycle bin");
        Ok(true)
    }

    /// Move a recycle-bin entry back to the front of the active list.
    ///
    /// Returns `false` if `id` is not in the bin. Under
    /// [`RestorePolicy::RejectDuplicate`] a code held by an active medicine
    /// fails with [`CatalogError::DuplicateCode`] and nothing moves.
    pub fn restore(&mut self, id: &str) -> CatalogResult<bool> {
        let Some(index) = self.recycle_bin.iter().position(|m| m.id == id) else {
            debug!(id, "restore: not in recycle bin");
            return Ok(false);
        };

        let code = &self.recycle_bin[index].code_name;
        if self.is_code_taken(code, Some(id)) {
            match self.config.restore_policy {
                RestorePolicy::RejectDuplicate => {
                    warn!(id, code = %code, "restore rejected: code already in use");
                    return Err(CatalogError::DuplicateCode(canonical_code(code)));
                }
                RestorePolicy::Permissive => {
                    warn!(id, code = %code, "restoring medicine whose code is already in use");
                }
            }
        }

        let medicine = self.recycle_bin.remove(index);
        self.medicines.insert(0, medicine);
        self.persist_medicines()?;
        self.persist_recycle_bin()?;

        info!(id, "medicine restored");
        Ok(true)
    }

    /// Permanently remove a recycle-bin entry.
    ///
    /// Returns `false` if `id` is not in the bin.
    pub fn purge(&mut self, id: &str) -> CatalogResult<bool> {
        let Some(index) = self.recycle_bin.iter().position(|m| m.id == id) else {
            debug!(id, "purge: not in recycle bin");
            return Ok(false);
        };

        self.recycle_bin.remove(index);
        self.persist_recycle_bin()?;

        info!(id, "medicine purged");
        Ok(true)
    }

    /// Form values for editing an active medicine.
    ///
    /// The price is shown without its currency suffix.
    pub fn edit_form(&self, id: &str) -> Option<MedicineInput> {
        let medicine = self.get(id)?;
        Some(MedicineInput {
            code_name: medicine.code_name.clone(),
            full_name: medicine.full_name.clone(),
            category: medicine.category.clone(),
            generic_name: medicine.generic_name.clone().unwrap_or_default(),
            dosage: medicine.dosage.clone().unwrap_or_default(),
            form: medicine.form.clone().unwrap_or_default(),
            unit_price: medicine
                .unit_price
                .as_deref()
                .map(|p| strip_currency(p, &self.config.currency_suffix))
                .unwrap_or_default(),
            pack_size: medicine
                .details
                .as_ref()
                .and_then(|d| d.pack_size.clone())
                .unwrap_or_default(),
        })
    }
}
