//! Category tabs.

/// A category label. Plain string so user-created tabs need no registry.
pub type Category = String;

/// Built-in tabs that change sort order instead of filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualCategory {
    /// All medicines, sorted by code name
    Code,
    /// All medicines, sorted by brand name
    Brand,
    /// All medicines, sorted by generic name
    Generic,
}

impl VirtualCategory {
    pub const ALL: [VirtualCategory; 3] = [
        VirtualCategory::Code,
        VirtualCategory::Brand,
        VirtualCategory::Generic,
    ];

    /// Parse an exact (case-sensitive) category label.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Code" => Some(VirtualCategory::Code),
            "Brand" => Some(VirtualCategory::Brand),
            "Generic" => Some(VirtualCategory::Generic),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VirtualCategory::Code => "Code",
            VirtualCategory::Brand => "Brand",
            VirtualCategory::Generic => "Generic",
        }
    }
}

/// Categories created on first launch.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "Code",
    "Brand",
    "Generic",
    "Antibiotics",
    "Cardiac",
    "Vitamins",
    "Indication",
];

/// Default category list as owned labels.
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

/// Whether a category can never be removed.
pub fn is_protected(label: &str) -> bool {
    VirtualCategory::parse(label).is_some()
}
