//! SQLite schema definition.

/// Database schema for the key-value record store.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Catalog records (one JSON document per key)
-- ============================================================================

CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,                         -- JSON document
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
