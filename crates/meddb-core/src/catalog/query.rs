//! Search, filter and sort over the active medicine list.
//!
//! Everything here is a pure function of its inputs and returns a fresh
//! owned list; nothing aliases the store's collections.

use std::cmp::Ordering;

use crate::models::{Medicine, VirtualCategory};

/// Queries shorter than this (after trimming) only match when empty.
pub const MIN_QUERY_CHARS: usize = 2;

/// The list shown for a category tab and search box.
///
/// - A one-character query shows nothing.
/// - Virtual tabs (`Code`, `Brand`, `Generic`) show every medicine sorted
///   by that field; any other tab shows its own medicines, newest first.
/// - A query of two or more characters keeps medicines whose code, brand
///   or generic name contains it, ignoring case.
///
/// Sorting is stable, so ties keep their order in `medicines`.
pub fn view(medicines: &[Medicine], category: &str, query: &str) -> Vec<Medicine> {
    let q = query.trim().to_lowercase();
    let q_len = q.chars().count();
    if q_len == 1 {
        return Vec::new();
    }

    let sort_mode = VirtualCategory::parse(category);

    let mut list: Vec<Medicine> = medicines
        .iter()
        .filter(|m| sort_mode.is_some() || m.category == category)
        .filter(|m| q_len < MIN_QUERY_CHARS || matches_query(m, &q))
        .cloned()
        .collect();

    match sort_mode {
        Some(VirtualCategory::Code) => {
            list.sort_by(|a, b| locale_compare(&a.code_name, &b.code_name))
        }
        Some(VirtualCategory::Brand) => {
            list.sort_by(|a, b| locale_compare(&a.full_name, &b.full_name))
        }
        Some(VirtualCategory::Generic) => list.sort_by(|a, b| {
            locale_compare(
                a.generic_name.as_deref().unwrap_or(""),
                b.generic_name.as_deref().unwrap_or(""),
            )
        }),
        None => list.sort_by(|a, b| b.added_at.cmp(&a.added_at)),
    }

    list
}

/// Other medicines sharing the first word of `medicine`'s brand name.
pub fn variants(medicines: &[Medicine], medicine: &Medicine) -> Vec<Medicine> {
    let stem = medicine.brand_stem();
    medicines
        .iter()
        .filter(|m| m.id != medicine.id && m.brand_stem() == stem)
        .cloned()
        .collect()
}

/// All medicines, most recently added first.
pub fn recent(medicines: &[Medicine]) -> Vec<Medicine> {
    let mut list = medicines.to_vec();
    list.sort_by(|a, b| b.added_at.cmp(&a.added_at));
    list
}

/// Management-screen filter: brand or code contains `text`, ignoring case.
///
/// Unlike [`view`] there is no minimum length and no trimming.
pub fn filter_entries(medicines: &[Medicine], text: &str) -> Vec<Medicine> {
    let needle = text.to_lowercase();
    medicines
        .iter()
        .filter(|m| {
            m.full_name.to_lowercase().contains(&needle)
                || m.code_name.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Case-insensitive ordering; case-only ties put lower case first.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

fn matches_query(medicine: &Medicine, q: &str) -> bool {
    medicine.code_name.to_lowercase().contains(q)
        || medicine.full_name.to_lowercase().contains(q)
        || medicine
            .generic_name
            .as_deref()
            .map(|g| g.to_lowercase().contains(q))
            .unwrap_or(false)
}
