//! Unit price normalization.
//!
//! Prices are free-form text. Stored prices always carry the currency
//! suffix; the edit form shows them without it.

/// Currency suffix used when none is configured.
pub const DEFAULT_CURRENCY: &str = "BDT";

/// Normalize a typed price for storage.
///
/// Returns `None` for blank input. Input that already mentions the
/// currency is kept as typed (trimmed); otherwise ` <currency>` is appended.
pub fn normalize_unit_price(raw: &str, currency: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains(currency) {
        Some(trimmed.to_string())
    } else {
        Some(format!("{} {}", trimmed, currency))
    }
}

/// Strip the currency suffix for editing.
pub fn strip_currency(price: &str, currency: &str) -> String {
    price.replace(&format!(" {}", currency), "")
}
