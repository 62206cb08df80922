//! Medicine catalog models.

use serde::{Deserialize, Deserializer, Serialize};

/// A single medicine in the catalog.
///
/// Field names serialize in camelCase so backups written by earlier
/// releases of the app load without conversion. Every field has a default
/// and tolerates `null` or a wrong JSON type, so partially-formed entries
/// from a backup still decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Medicine {
    /// Opaque unique identifier, never changes once assigned
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    /// Short upper-case code, unique among active medicines
    #[serde(deserialize_with = "lenient_string")]
    pub code_name: String,
    /// Brand / display name
    #[serde(deserialize_with = "lenient_string")]
    pub full_name: String,
    /// Category label (soft reference, may dangle)
    #[serde(deserialize_with = "lenient_string")]
    pub category: String,
    /// Free-form description
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    /// Creation time in milliseconds since the Unix epoch
    #[serde(deserialize_with = "lenient_millis")]
    pub added_at: i64,
    /// Strength (e.g., "500mg")
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub dosage: Option<String>,
    /// Form (e.g., "Tablet", "Injection")
    #[serde(
        rename = "type",
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub form: Option<String>,
    /// Generic (INN) name
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub generic_name: Option<String>,
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub manufacturer: Option<String>,
    /// Unit price including the currency suffix (e.g., "12.50 BDT")
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_price: Option<String>,
    #[serde(
        deserialize_with = "lenient_string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub available_forms: Option<Vec<String>>,
    #[serde(
        deserialize_with = "lenient_details",
        skip_serializing_if = "Option::is_none"
    )]
    pub details: Option<MedicineDetails>,
}

/// Therapeutic information shown on the detail screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicineDetails {
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub indications: Option<String>,
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub adult_dose: Option<String>,
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub child_dose: Option<String>,
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub renal_dose: Option<String>,
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub administration: Option<String>,
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub contraindications: Option<String>,
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub side_effects: Option<String>,
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub precautions: Option<String>,
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub pregnancy: Option<String>,
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub therapeutic_class: Option<String>,
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub mode_of_action: Option<String>,
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub interaction: Option<String>,
    #[serde(
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub pack_size: Option<String>,
}

/// Named section of [`MedicineDetails`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailSection {
    Indications,
    AdultDose,
    ChildDose,
    RenalDose,
    Administration,
    Contraindications,
    SideEffects,
    Precautions,
    Pregnancy,
    TherapeuticClass,
    ModeOfAction,
    Interaction,
    PackSize,
}

impl DetailSection {
    /// Sections listed on the detail screen, in display order.
    pub const DISPLAYED: [DetailSection; 4] = [
        DetailSection::Indications,
        DetailSection::AdultDose,
        DetailSection::SideEffects,
        DetailSection::Precautions,
    ];

    /// JSON key of the section (e.g., "adultDose").
    pub fn key(self) -> &'static str {
        match self {
            DetailSection::Indications => "indications",
            DetailSection::AdultDose => "adultDose",
            DetailSection::ChildDose => "childDose",
            DetailSection::RenalDose => "renalDose",
            DetailSection::Administration => "administration",
            DetailSection::Contraindications => "contraindications",
            DetailSection::SideEffects => "sideEffects",
            DetailSection::Precautions => "precautions",
            DetailSection::Pregnancy => "pregnancy",
            DetailSection::TherapeuticClass => "therapeuticClass",
            DetailSection::ModeOfAction => "modeOfAction",
            DetailSection::Interaction => "interaction",
            DetailSection::PackSize => "packSize",
        }
    }

    /// Human-readable heading (e.g., "Adult Dose").
    pub fn title(self) -> &'static str {
        match self {
            DetailSection::Indications => "Indications",
            DetailSection::AdultDose => "Adult Dose",
            DetailSection::ChildDose => "Child Dose",
            DetailSection::RenalDose => "Renal Dose",
            DetailSection::Administration => "Administration",
            DetailSection::Contraindications => "Contraindications",
            DetailSection::SideEffects => "Side Effects",
            DetailSection::Precautions => "Precautions",
            DetailSection::Pregnancy => "Pregnancy",
            DetailSection::TherapeuticClass => "Therapeutic Class",
            DetailSection::ModeOfAction => "Mode Of Action",
            DetailSection::Interaction => "Interaction",
            DetailSection::PackSize => "Pack Size",
        }
    }

    /// Look up a section by its JSON key.
    pub fn from_key(key: &str) -> Option<Self> {
        const ALL: [DetailSection; 13] = [
            DetailSection::Indications,
            DetailSection::AdultDose,
            DetailSection::ChildDose,
            DetailSection::RenalDose,
            DetailSection::Administration,
            DetailSection::Contraindications,
            DetailSection::SideEffects,
            DetailSection::Precautions,
            DetailSection::Pregnancy,
            DetailSection::TherapeuticClass,
            DetailSection::ModeOfAction,
            DetailSection::Interaction,
            DetailSection::PackSize,
        ];
        ALL.into_iter().find(|s| s.key() == key)
    }
}

impl MedicineDetails {
    /// Get the text of a section, if set.
    pub fn get(&self, section: DetailSection) -> Option<&str> {
        let value = match section {
            DetailSection::Indications => &self.indications,
            DetailSection::AdultDose => &self.adult_dose,
            DetailSection::ChildDose => &self.child_dose,
            DetailSection::RenalDose => &self.renal_dose,
            DetailSection::Administration => &self.administration,
            DetailSection::Contraindications => &self.contraindications,
            DetailSection::SideEffects => &self.side_effects,
            DetailSection::Precautions => &self.precautions,
            DetailSection::Pregnancy => &self.pregnancy,
            DetailSection::TherapeuticClass => &self.therapeutic_class,
            DetailSection::ModeOfAction => &self.mode_of_action,
            DetailSection::Interaction => &self.interaction,
            DetailSection::PackSize => &self.pack_size,
        };
        value.as_deref()
    }
}

/// Form input for creating or editing a medicine.
///
/// Empty strings mean "not provided". On update, empty `code_name`,
/// `full_name` and `category` keep the existing value; every other field
/// overwrites, so an empty value clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MedicineInput {
    pub code_name: String,
    pub full_name: String,
    pub category: String,
    pub generic_name: String,
    pub dosage: String,
    pub form: String,
    /// Price as typed, with or without the currency suffix
    pub unit_price: String,
    pub pack_size: String,
}

impl MedicineInput {
    /// Create an input with the two required fields.
    pub fn new(code_name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            code_name: code_name.into(),
            full_name: full_name.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Upper-cased, trimmed code as it will be stored.
    pub fn canonical_code(&self) -> String {
        canonical_code(&self.code_name)
    }
}

impl Medicine {
    /// Create a new medicine with a fresh ID and the current time.
    pub fn new(code_name: String, full_name: String, category: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            code_name,
            full_name,
            category,
            added_at: chrono::Utc::now().timestamp_millis(),
            ..Default::default()
        }
    }

    /// Whether this medicine's code matches `code` ignoring case.
    pub fn has_code(&self, code: &str) -> bool {
        self.code_name.to_uppercase() == code.to_uppercase()
    }

    /// Detail text for a section, if any.
    pub fn detail(&self, section: DetailSection) -> Option<&str> {
        self.details.as_ref().and_then(|d| d.get(section))
    }

    /// First whitespace-delimited word of the brand name.
    pub fn brand_stem(&self) -> &str {
        self.full_name.split(' ').next().unwrap_or("")
    }
}

/// Trim and upper-case a code name.
pub fn canonical_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Trimmed text, or `None` when empty.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Text field of a backup entry: numbers and booleans keep their text,
/// anything else is empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(scalar_text(value).unwrap_or_default())
}

/// Optional text field: `null` and non-scalar values become `None`.
fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(scalar_text(value))
}

/// Keep the scalar items of an array; anything but an array is `None`.
fn lenient_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => {
            Ok(Some(items.into_iter().filter_map(scalar_text).collect()))
        }
        _ => Ok(None),
    }
}

/// Detail sections decode only from an object.
fn lenient_details<'de, D>(deserializer: D) -> Result<Option<MedicineDetails>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

fn scalar_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accept integer, float or numeric-string timestamps; anything else is 0.
fn lenient_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| s.trim().parse::<f64>().ok().map(|f| f as i64))
            .unwrap_or(0),
        _ => 0,
    })
}
