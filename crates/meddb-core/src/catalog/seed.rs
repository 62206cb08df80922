//! Sample catalog installed on first launch.

use crate::models::Medicine;

/// (id, code, brand name, generic name, category, form, strength)
const SAMPLE: [(&str, &str, &str, &str, &str, &str, Option<&str>); 5] = [
    (
        "m02",
        "02",
        "MYSULIN 30/70(100 UNIT) 10ML",
        "Isophane Insulin + Soluble Insulin",
        "Cardiac",
        "Vial/Injection",
        None,
    ),
    ("m37", "37", "TRIALON INJECTION", "Triamcinolone", "Brand", "Injection", None),
    ("mabs", "ABS", "ALBASINE TABLET", "Albendazole", "Brand", "Tablet", None),
    (
        "mazm",
        "AZM",
        "AZIMEX TABLET-500MG",
        "Azithromycin",
        "Antibiotics",
        "Tablet",
        Some("500mg"),
    ),
    (
        "mbe2",
        "BE2",
        "BETALOC-25 TABLET",
        "Metoprolol",
        "Cardiac",
        "Tablet",
        Some("25mg"),
    ),
];

/// Sample medicines, all stamped with `now`.
pub fn sample_medicines(now: i64) -> Vec<Medicine> {
    SAMPLE
        .iter()
        .map(|(id, code, name, generic, category, form, dosage)| Medicine {
            id: id.to_string(),
            code_name: code.to_string(),
            full_name: name.to_string(),
            generic_name: Some(generic.to_string()),
            category: category.to_string(),
            form: Some(form.to_string()),
            dosage: dosage.map(str::to_string),
            added_at: now,
            ..Default::default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_codes_are_unique() {
        let meds = sample_medicines(1);
        let codes: HashSet<_> = meds.iter().map(|m| m.code_name.to_uppercase()).collect();
        assert_eq!(codes.len(), meds.len());
        assert!(meds.iter().all(|m| m.added_at == 1));
    }
}
