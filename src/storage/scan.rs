//! Listing of the documents folder.

use std::path::Path;

use walkdir::WalkDir;

use crate::domain::{Config, Document};

/// Lists the documents directly inside `dir`, sorted by filename.
///
/// Only files whose extension is one of the configured document extensions
/// are returned. Subdirectories are not descended into. A missing directory
/// yields no documents.
#[must_use]
pub fn scan_documents(dir: &Path, config: &Config) -> Vec<Document> {
    if !dir.is_dir() {
        tracing::warn!("Documents folder {} not found, no documents listed", dir.display());
        return Vec::new();
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| config.is_document_extension(e))
        })
        .filter_map(|entry| match entry.file_name().to_str() {
            Some(name) => Some(Document::new(name)),
            None => {
                tracing::debug!("Skipping non UTF-8 filename {}", entry.path().display());
                None
            }
        })
        .collect()
}
