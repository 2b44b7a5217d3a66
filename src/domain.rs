//! Domain models for drawing registers.
//!
//! This module contains the filesystem-agnostic rules: parsing codes out of
//! filenames, classifying them against the category registry, ordering them
//! for presentation and assembling report rows.

/// Drawing codes and tank designations parsed from filenames.
pub mod code;
pub use code::{Code, Tank, UNCLASSIFIED, extract_code};

/// The static category registry.
pub mod category;
pub use category::Registry;

/// Filename-derived document records.
pub mod document;
pub use document::Document;

/// Descriptions and package membership.
pub mod classifier;
pub use classifier::{Classification, Classifier};

mod config;
pub use config::{Config, ConfigError};

/// Presentation groups and report order.
pub mod ordering;
pub use ordering::{Group, Sorter};

mod package;
pub use package::{Package, UnknownPackageError};

/// Report rows and revision lookup.
pub mod report;
pub use report::{Assembler, Report, RevisionEntry, RevisionLookup, Selection};
