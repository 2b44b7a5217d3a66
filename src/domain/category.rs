//! The static category registry.
//!
//! Two record shapes cover the two code families: [`NumericCategory`] for
//! `DDTT` drawings, keyed by the two-digit category, and [`CodeCategory`] for
//! letter-prefixed documents, keyed by the full code. The tables are checked
//! once when the [`Registry`] is built and are never mutated afterwards.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::LazyLock,
};

use super::{Code, Package};

const ALL: &[Package] = &[
    Package::ForClient,
    Package::ForManufacture,
    Package::ForInstallation,
];
const MANUFACTURE_INSTALLATION: &[Package] = &[Package::ForManufacture, Package::ForInstallation];
const CLIENT_INSTALLATION: &[Package] = &[Package::ForClient, Package::ForInstallation];
const CLIENT_MANUFACTURE: &[Package] = &[Package::ForClient, Package::ForManufacture];
const MANUFACTURE: &[Package] = &[Package::ForManufacture];

/// Metadata for a two-digit drawing category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericCategory {
    /// Two-digit category key, e.g. `"11"`.
    pub key: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Optional longer description.
    pub description: Option<&'static str>,
    /// Whether the type digits distinguish individual elements.
    pub element_based: bool,
    /// Audiences the category is issued to.
    pub packages: &'static [Package],
}

impl NumericCategory {
    /// Returns an owned copy of the package set.
    #[must_use]
    pub fn packages(&self) -> BTreeSet<Package> {
        self.packages.iter().copied().collect()
    }
}

/// The family a letter-prefixed code belongs to, given by its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Family {
    /// `D` codes.
    Document,
    /// `C` codes.
    Calculation,
    /// `M` codes.
    Model,
    /// `P` codes.
    Protocol,
}

impl Family {
    /// Returns the family for a code prefix, if it is one of `D`, `C`, `M`, `P`.
    #[must_use]
    pub const fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'D' => Some(Self::Document),
            'C' => Some(Self::Calculation),
            'M' => Some(Self::Model),
            'P' => Some(Self::Protocol),
            _ => None,
        }
    }
}

/// Metadata for a letter-prefixed document code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeCategory {
    /// Full code key, e.g. `"D000"`.
    pub key: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Optional longer description.
    pub description: Option<&'static str>,
    /// Audiences the document is issued to.
    pub packages: &'static [Package],
}

impl CodeCategory {
    /// Returns an owned copy of the package set.
    #[must_use]
    pub fn packages(&self) -> BTreeSet<Package> {
        self.packages.iter().copied().collect()
    }
}

const fn numeric(
    key: &'static str,
    label: &'static str,
    element_based: bool,
    packages: &'static [Package],
) -> NumericCategory {
    NumericCategory {
        key,
        label,
        description: None,
        element_based,
        packages,
    }
}

const fn coded(
    key: &'static str,
    label: &'static str,
    description: &'static str,
    packages: &'static [Package],
) -> CodeCategory {
    CodeCategory {
        key,
        label,
        description: Some(description),
        packages,
    }
}

/// Numeric drawing categories.
pub const DRAWING_CATEGORIES: &[NumericCategory] = &[
    // wall panels / primary structure
    NumericCategory {
        description: Some("Plan layout with panel numbering"),
        ..numeric("10", "Panel general arrangement", false, ALL)
    },
    numeric("11", "Concrete layout", true, ALL),
    numeric("12", "Concrete layout detail", true, ALL),
    numeric("13", "Reinforcement layout", true, MANUFACTURE_INSTALLATION),
    numeric("14", "Reinforcement layout detail", true, MANUFACTURE_INSTALLATION),
    numeric("19", "Drilling areas / general", true, MANUFACTURE_INSTALLATION),
    // buttresses
    numeric("41", "Buttress concrete layout", true, ALL),
    numeric("42", "Buttress concrete layout detail", true, ALL),
    numeric("43", "Buttress reinforcement layout", true, MANUFACTURE_INSTALLATION),
    numeric("44", "Buttress reinforcement layout detail", true, MANUFACTURE_INSTALLATION),
    // base, excavation, setting out
    numeric("50", "Setting out / reference", false, MANUFACTURE_INSTALLATION),
    numeric("51", "Excavation", false, ALL),
    // roof
    numeric("60", "Roof layout (legacy)", false, CLIENT_INSTALLATION),
    numeric("61", "Roof concrete layout", true, ALL),
    numeric("62", "Roof concrete layout detail", true, ALL),
    numeric("63", "Roof reinforcement layout", true, MANUFACTURE_INSTALLATION),
    numeric("64", "Roof reinforcement layout detail", true, MANUFACTURE_INSTALLATION),
    // baseplate
    NumericCategory {
        description: Some("Interfaces and relation drawings"),
        ..numeric("70", "Baseplate relations", false, ALL)
    },
    numeric("71", "Baseplate geometry", false, ALL),
    numeric("72", "Baseplate geometry detail", false, MANUFACTURE_INSTALLATION),
    NumericCategory {
        description: Some("Base mesh and ring beam stirrups"),
        ..numeric("73", "Baseplate reinforcement", false, MANUFACTURE_INSTALLATION)
    },
    // alternative roof
    numeric("80", "Roof layout (alternative legacy)", false, ALL),
    numeric("81", "Roof concrete layout", true, ALL),
    numeric("82", "Roof concrete layout detail", true, ALL),
    numeric("83", "Roof reinforcement layout", true, MANUFACTURE_INSTALLATION),
    numeric("84", "Roof reinforcement layout detail", true, MANUFACTURE_INSTALLATION),
    // temporary works
    numeric("90", "Temporary works general", false, MANUFACTURE_INSTALLATION),
    numeric("91", "Temporary works concrete layout", true, MANUFACTURE_INSTALLATION),
    numeric("92", "Temporary works detail", true, MANUFACTURE_INSTALLATION),
    numeric("93", "Temporary works reinforcement layout", true, MANUFACTURE_INSTALLATION),
    numeric("94", "Temporary works reinforcement detail", true, MANUFACTURE_INSTALLATION),
];

/// `D` codes.
pub const DOCUMENT_CATEGORIES: &[CodeCategory] = &[
    coded(
        "D000",
        "Drawing list / document register",
        "Index of drawings and documents for the project",
        CLIENT_INSTALLATION,
    ),
    coded(
        "D010",
        "Official order (manufacture)",
        "Manufacture order list with drawing references and required panel quantities",
        MANUFACTURE,
    ),
    coded(
        "D100",
        "Design risk assessment",
        "Designer risk assessment and hazard identification",
        CLIENT_INSTALLATION,
    ),
    coded(
        "D110",
        "User / operator manual",
        "Operation, use, and maintenance instructions",
        CLIENT_INSTALLATION,
    ),
];

/// `C` codes.
pub const CALCULATION_CATEGORIES: &[CodeCategory] = &[
    coded(
        "C100",
        "Baseplate calculations",
        "Structural design calculations for baseplate",
        ALL,
    ),
    coded(
        "C110",
        "Wall panel calculations",
        "Structural design calculations for wall panels",
        ALL,
    ),
    coded(
        "C120",
        "Wall propping calculations",
        "Temporary propping and stability calculations",
        MANUFACTURE_INSTALLATION,
    ),
    coded(
        "C130",
        "Roof calculations",
        "Structural design calculations for roof elements",
        ALL,
    ),
    coded(
        "C190",
        "General calculations",
        "General or supporting structural calculations",
        ALL,
    ),
];

/// `M` codes.
pub const MODEL_CATEGORIES: &[CodeCategory] = &[coded(
    "M100",
    "3D model (tank)",
    "Native 3D coordination and reference model",
    CLIENT_MANUFACTURE,
)];

/// `P` codes.
pub const PROTOCOL_CATEGORIES: &[CodeCategory] = &[
    coded(
        "P100",
        "Installation / post-tensioning protocol",
        "General installation and post-tensioning procedure",
        MANUFACTURE_INSTALLATION,
    ),
    coded(
        "P110",
        "Wall panel tensioning protocol",
        "Procedure for stressing wall panel tendons",
        MANUFACTURE_INSTALLATION,
    ),
    coded(
        "P120",
        "Tendon elongation records",
        "Measured and calculated tendon elongations",
        MANUFACTURE_INSTALLATION,
    ),
    coded(
        "P130",
        "Stressing sequence documentation",
        "Defined stressing order and sequence",
        MANUFACTURE_INSTALLATION,
    ),
    coded(
        "P190",
        "Other installation / PT documents",
        "Other installation or post-tensioning records",
        MANUFACTURE_INSTALLATION,
    ),
];

static BUILT_IN: LazyLock<Registry> = LazyLock::new(|| {
    Registry::new(
        DRAWING_CATEGORIES,
        [
            DOCUMENT_CATEGORIES,
            CALCULATION_CATEGORIES,
            MODEL_CATEGORIES,
            PROTOCOL_CATEGORIES,
        ]
        .concat(),
    )
    .expect("built-in category tables are valid")
});

/// Lookup of category metadata by numeric category or full code.
///
/// Misses are never errors: callers treat an absent entry as unclassifiable.
#[derive(Debug, Clone)]
pub struct Registry {
    numeric: BTreeMap<&'static str, NumericCategory>,
    codes: BTreeMap<&'static str, CodeCategory>,
}

impl Registry {
    /// Builds a registry from category tables, checking every key.
    ///
    /// Letter-prefixed families are merged into a single table keyed by the
    /// full code.
    ///
    /// # Errors
    ///
    /// Returns an error if a key has the wrong shape or appears twice.
    pub fn new(
        numeric: &[NumericCategory],
        codes: impl IntoIterator<Item = CodeCategory>,
    ) -> Result<Self, RegistryError> {
        let mut numeric_map = BTreeMap::new();
        for category in numeric {
            if category.key.len() != 2 || !category.key.bytes().all(|b| b.is_ascii_digit()) {
                return Err(RegistryError::InvalidKey(category.key));
            }
            if numeric_map.insert(category.key, *category).is_some() {
                return Err(RegistryError::DuplicateKey(category.key));
            }
        }

        let mut code_map = BTreeMap::new();
        for category in codes {
            match category.key.parse::<Code>() {
                Ok(Code::Alphanumeric(code))
                    if code.as_str() == category.key
                        && Family::from_prefix(code.prefix()).is_some() => {}
                _ => return Err(RegistryError::InvalidKey(category.key)),
            }
            if code_map.insert(category.key, category).is_some() {
                return Err(RegistryError::DuplicateKey(category.key));
            }
        }

        Ok(Self {
            numeric: numeric_map,
            codes: code_map,
        })
    }

    /// Returns the process-wide registry built from the built-in tables.
    #[must_use]
    pub fn global() -> &'static Self {
        &BUILT_IN
    }

    /// Looks up a two-digit drawing category.
    #[must_use]
    pub fn numeric(&self, category: &str) -> Option<&NumericCategory> {
        self.numeric.get(category)
    }

    /// Looks up a letter-prefixed code.
    #[must_use]
    pub fn code(&self, code: &str) -> Option<&CodeCategory> {
        self.codes.get(code)
    }
}

/// Errors found while building a [`Registry`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A key does not have the shape its table requires.
    #[error("Invalid category key '{0}'")]
    InvalidKey(&'static str),

    /// A key appears more than once across the tables.
    #[error("Duplicate category key '{0}'")]
    DuplicateKey(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_tables_are_valid() {
        let registry = Registry::global();
        for category in DRAWING_CATEGORIES {
            assert_eq!(registry.numeric(category.key), Some(category));
        }
        for table in [
            DOCUMENT_CATEGORIES,
            CALCULATION_CATEGORIES,
            MODEL_CATEGORIES,
            PROTOCOL_CATEGORIES,
        ] {
            for category in table {
                assert_eq!(registry.code(category.key), Some(category));
            }
        }
    }

    #[test]
    fn families_are_merged() {
        let registry = Registry::global();
        for key in ["D000", "C110", "M100", "P110"] {
            assert!(registry.code(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn lookup_miss_is_none() {
        let registry = Registry::global();
        assert!(registry.numeric("99").is_none());
        assert!(registry.code("D999").is_none());
        assert!(registry.code("").is_none());
    }

    #[test]
    fn numeric_metadata() {
        let concrete = Registry::global().numeric("11").unwrap();
        assert_eq!(concrete.label, "Concrete layout");
        assert!(concrete.element_based);
        assert_eq!(concrete.packages(), Package::ALL.into_iter().collect());

        let legacy_roof = Registry::global().numeric("60").unwrap();
        assert!(!legacy_roof.element_based);
        assert!(!legacy_roof.packages().contains(&Package::ForManufacture));
    }

    #[test]
    fn packages_are_copied() {
        let mut packages = Registry::global().numeric("11").unwrap().packages();
        packages.clear();
        assert_eq!(Registry::global().numeric("11").unwrap().packages().len(), 3);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let tables = [numeric("11", "a", true, ALL), numeric("11", "b", true, ALL)];
        let error = Registry::new(&tables, []).unwrap_err();
        assert_eq!(error, RegistryError::DuplicateKey("11"));
    }

    #[test]
    fn malformed_keys_are_rejected() {
        let error = Registry::new(&[numeric("1", "a", true, ALL)], []).unwrap_err();
        assert_eq!(error, RegistryError::InvalidKey("1"));

        let error = Registry::new(&[], [coded("X100", "a", "b", ALL)]).unwrap_err();
        assert_eq!(error, RegistryError::InvalidKey("X100"));

        let error = Registry::new(&[], [coded("d000", "a", "b", ALL)]).unwrap_err();
        assert_eq!(error, RegistryError::InvalidKey("d000"));
    }

    #[test]
    fn family_from_prefix() {
        assert_eq!(Family::from_prefix('M'), Some(Family::Model));
        assert_eq!(Family::from_prefix('X'), None);
    }
}
