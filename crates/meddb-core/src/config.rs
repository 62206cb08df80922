//! Catalog configuration.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `currency_suffix` | `"BDT"` | Appended to unit prices that lack it |
//! | `restore_policy` | `"permissive"` | What restore does when the code is taken |
//! | `seed_sample_data` | `true` | Seed the sample medicines on first launch |
//!
//! The host app passes the configuration as JSON; missing keys take their
//! defaults.

use serde::{Deserialize, Serialize};

use crate::models::DEFAULT_CURRENCY;

/// How `restore` treats a code name that an active medicine already holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RestorePolicy {
    /// Restore unconditionally; the active list may briefly hold a duplicate
    /// code until the user edits one of them.
    #[default]
    Permissive,
    /// Refuse the restore with a duplicate-code error and leave the entry
    /// in the recycle bin.
    RejectDuplicate,
}

/// Configuration for a catalog store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    pub currency_suffix: String,
    pub restore_policy: RestorePolicy,
    pub seed_sample_data: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            currency_suffix: DEFAULT_CURRENCY.to_string(),
            restore_policy: RestorePolicy::Permissive,
            seed_sample_data: true,
        }
    }
}

impl CatalogConfig {
    /// Parse configuration JSON. Blank input yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }

    /// Defaults without sample data, for tests and fresh imports.
    pub fn empty() -> Self {
        Self {
            seed_sample_data: false,
            ..Self::default()
        }
    }

    pub fn with_restore_policy(mut self, policy: RestorePolicy) -> Self {
        self.restore_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.currency_suffix, "BDT");
        assert_eq!(config.restore_policy, RestorePolicy::Permissive);
        assert!(config.seed_sample_data);
    }

    #[test]
    fn test_partial_json() {
        let config = CatalogConfig::from_json(r#"{"restore_policy": "reject_duplicate"}"#).unwrap();
        assert_eq!(config.restore_policy, RestorePolicy::RejectDuplicate);
        assert_eq!(config.currency_suffix, "BDT");
    }

    #[test]
    fn test_blank_json_is_default() {
        assert_eq!(CatalogConfig::from_json("  ").unwrap(), CatalogConfig::default());
    }

    #[test]
    fn test_invalid_json() {
        assert!(CatalogConfig::from_json("{").is_err());
        assert!(CatalogConfig::from_json(r#"{"restore_policy": "rename"}"#).is_err());
    }
}
