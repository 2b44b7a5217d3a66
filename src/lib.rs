//! Drawing register generation
//!
//! Drawings and documents are classified by a code embedded in their
//! filenames, matched against a revision register and rendered into
//! per-audience LaTeX tables.

pub mod domain;
pub use domain::{Classifier, Code, Config, Document, Package, Registry, Sorter};

/// Filesystem glue: scanning, the revision register and rendered output.
pub mod storage;
pub use storage::{Register, RegisterError};
