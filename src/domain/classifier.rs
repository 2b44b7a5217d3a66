//! Maps filenames to descriptions and audience packages.
//!
//! Rules:
//! - unclassifiable filename: description `N/A`, no packages
//! - numeric code: looked up by its two-digit category. Element-based
//!   categories append the type (`"Concrete layout type 02"`), others show
//!   the label alone.
//! - letter-prefixed code: looked up by the full code, shown as
//!   `"{label} — {description}"` when a description is present.
//!
//! Codes missing from the registry behave like unclassifiable filenames. A
//! letter-prefixed code never defaults to every package.

use std::collections::BTreeSet;

use super::{
    Code, Document, Package, UNCLASSIFIED,
    category::{Family, Registry},
};

/// The result of classifying one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Human-readable description, `N/A` when unclassifiable.
    pub description: String,
    /// Audiences the document is issued to.
    pub packages: BTreeSet<Package>,
    /// Whether the document is an element drawing.
    pub element_based: bool,
}

impl Classification {
    fn unclassified() -> Self {
        Self {
            description: UNCLASSIFIED.to_string(),
            packages: BTreeSet::new(),
            element_based: false,
        }
    }

    /// Returns `true` if the document belongs to `package`.
    #[must_use]
    pub fn is_in(&self, package: Package) -> bool {
        self.packages.contains(&package)
    }
}

/// Classifies documents against a category [`Registry`].
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    registry: &'a Registry,
}

impl Default for Classifier<'static> {
    fn default() -> Self {
        Self::new(Registry::global())
    }
}

impl<'a> Classifier<'a> {
    /// Creates a classifier over the given registry.
    #[must_use]
    pub const fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Returns the registry this classifier reads from.
    #[must_use]
    pub const fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Classifies a parsed code.
    #[must_use]
    pub fn classify_code(&self, code: Option<&Code>) -> Classification {
        match code {
            None => Classification::unclassified(),
            Some(Code::Numeric(code)) => {
                let Some(category) = self.registry.numeric(code.category()) else {
                    tracing::debug!("Unknown drawing category {}", code.category());
                    return Classification::unclassified();
                };
                let description = if category.element_based {
                    format!("{} type {}", category.label, code.type_code())
                } else {
                    category.label.to_string()
                };
                Classification {
                    description,
                    packages: category.packages(),
                    element_based: category.element_based,
                }
            }
            Some(Code::Alphanumeric(code)) => {
                let Some(category) = self.registry.code(code.as_str()) else {
                    tracing::debug!("Unknown document code {code:?}");
                    return Classification::unclassified();
                };
                let description = match category.description {
                    Some(text) if !text.is_empty() => format!("{} — {text}", category.label),
                    _ => category.label.to_string(),
                };
                Classification {
                    description,
                    packages: category.packages(),
                    element_based: false,
                }
            }
        }
    }

    /// Classifies a document.
    #[must_use]
    pub fn classify(&self, document: &Document) -> Classification {
        self.classify_code(document.code())
    }

    /// Returns the description for a filename.
    #[must_use]
    pub fn describe(&self, filename: &str) -> String {
        self.classify_code(Code::from_filename(filename).as_ref())
            .description
    }

    /// Returns the packages a filename belongs to.
    #[must_use]
    pub fn packages_for(&self, filename: &str) -> BTreeSet<Package> {
        self.classify_code(Code::from_filename(filename).as_ref())
            .packages
    }

    /// Returns whether a filename is an element drawing.
    #[must_use]
    pub fn is_element_based(&self, filename: &str) -> bool {
        match Code::from_filename(filename) {
            Some(Code::Numeric(code)) => self
                .registry
                .numeric(code.category())
                .is_some_and(|category| category.element_based),
            _ => false,
        }
    }

    /// Returns the family of a letter-prefixed code.
    #[must_use]
    pub fn family(code: &Code) -> Option<Family> {
        match code {
            Code::Alphanumeric(code) => Family::from_prefix(code.prefix()),
            Code::Numeric(_) => None,
        }
    }
}
