//! The revision register: a delimited file with one row per document.
//!
//! The header row must contain `drawing_id`. The `rev`, `issue_date` and
//! `status` columns are optional. A register that does not exist is treated
//! as empty, but a register without its key column is rejected outright.

use std::{
    collections::{BTreeSet, HashMap},
    io,
    path::{Path, PathBuf},
};

use crate::domain::{Document, RevisionEntry, RevisionLookup};

/// The key column of the register.
pub const KEY_COLUMN: &str = "drawing_id";

const COLUMNS: [&str; 5] = [KEY_COLUMN, "rev", "issue_date", "status", "exists"];
const KEY: usize = 0;
const EXISTS: usize = 4;

/// Revision metadata loaded from a register file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    entries: HashMap<String, RevisionEntry>,
}

impl Register {
    /// Loads the register at `path`.
    ///
    /// A missing file is logged and yields an empty register.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid delimited
    /// text, or has no `drawing_id` column.
    pub fn load(path: &Path, delimiter: u8) -> Result<Self, RegisterError> {
        if !path.exists() {
            tracing::warn!("Register {} not found, revisions unknown", path.display());
            return Ok(Self::default());
        }

        let sheet = Sheet::read(path, delimiter)?;
        let [rev, issue_date, status] = ["rev", "issue_date", "status"].map(|c| sheet.column(c));

        let mut entries = HashMap::new();
        for record in &sheet.records {
            let id = field(record, Some(sheet.key));
            if id.is_empty() {
                continue;
            }
            let entry = RevisionEntry {
                rev: field(record, rev),
                issue_date: field(record, issue_date),
                status: field(record, status),
            };
            if entries.insert(id.clone(), entry).is_some() {
                tracing::debug!("Duplicate register row for {id}, keeping the last");
            }
        }

        tracing::debug!("Loaded {} register entries from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    /// Returns the entry for a base identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RevisionEntry> {
        self.entries.get(id)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the register has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RevisionLookup for Register {
    fn revision(&self, id: &str) -> Option<&RevisionEntry> {
        self.get(id)
    }
}

/// Counts reported by [`sync`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Rows added for documents the register did not know.
    pub added: usize,
    /// Identifiers whose document is in the folder.
    pub present: usize,
    /// Identifiers whose document is no longer in the folder.
    pub missing: usize,
}

/// Brings the register in line with a document listing.
///
/// Every row is marked `exists = no`, then every listed document is marked
/// `exists = yes`, adding an empty row where none exists. The known columns
/// are written first, followed by any other columns in their original
/// order. Rows are ordered by identifier; rows without one keep their
/// content and go last. No existing value is dropped.
///
/// # Errors
///
/// Returns an error if the existing register cannot be read or is missing its
/// key column, or if the updated register cannot be written.
pub fn sync(
    path: &Path,
    delimiter: u8,
    documents: &[Document],
) -> Result<SyncSummary, RegisterError> {
    let sheet = if path.exists() {
        Sheet::read(path, delimiter)?
    } else {
        tracing::info!("Creating register {}", path.display());
        Sheet::empty()
    };

    let extra: Vec<usize> = (0..sheet.headers.len())
        .filter(|&i| !COLUMNS.contains(&sheet.headers[i].as_str()))
        .collect();
    let sources: Vec<Option<usize>> = COLUMNS
        .iter()
        .map(|name| sheet.column(name))
        .chain(extra.iter().map(|&i| Some(i)))
        .collect();

    let mut rows: Vec<Vec<String>> = sheet
        .records
        .iter()
        .map(|record| {
            let mut row: Vec<String> = sources
                .iter()
                .map(|source| {
                    source
                        .and_then(|i| record.get(i))
                        .unwrap_or_default()
                        .to_string()
                })
                .collect();
            // fields past the end of the header row
            row.extend(record.iter().skip(sheet.headers.len()).map(str::to_string));
            row
        })
        .collect();

    let listed: BTreeSet<&str> = documents.iter().map(Document::base_id).collect();
    let mut known = BTreeSet::new();
    for row in &mut rows {
        let id = row[KEY].trim().to_string();
        if id.is_empty() {
            tracing::debug!("Keeping register row without {KEY_COLUMN} as is");
            continue;
        }
        row[KEY].clone_from(&id);
        row[EXISTS] = if listed.contains(id.as_str()) { "yes" } else { "no" }.to_string();
        known.insert(id);
    }

    let mut summary = SyncSummary::default();
    for id in &listed {
        if !known.contains(*id) {
            let mut row = vec![String::new(); sources.len()];
            row[KEY] = (*id).to_string();
            row[EXISTS] = "yes".to_string();
            rows.push(row);
            summary.added += 1;
        }
    }
    summary.present = listed.len();
    summary.missing = known
        .iter()
        .filter(|id| !listed.contains(id.as_str()))
        .count();

    rows.sort_by(|a, b| (a[KEY].is_empty(), &a[KEY]).cmp(&(b[KEY].is_empty(), &b[KEY])));

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(Vec::new());
    let csv_error = |source| RegisterError::Csv {
        path: path.to_path_buf(),
        source,
    };
    writer
        .write_record(
            COLUMNS
                .iter()
                .copied()
                .chain(extra.iter().map(|&i| sheet.headers[i].as_str())),
        )
        .map_err(csv_error)?;
    for row in &rows {
        writer.write_record(row).map_err(csv_error)?;
    }
    let bytes = writer.into_inner().map_err(|e| RegisterError::Io {
        path: path.to_path_buf(),
        source: e.into_error(),
    })?;

    std::fs::write(path, bytes).map_err(|source| RegisterError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(summary)
}

/// A register file as read: trimmed header names and every record.
struct Sheet {
    headers: Vec<String>,
    key: usize,
    records: Vec<csv::StringRecord>,
}

impl Sheet {
    fn empty() -> Self {
        Self {
            headers: COLUMNS.map(String::from).to_vec(),
            key: KEY,
            records: Vec::new(),
        }
    }

    fn read(path: &Path, delimiter: u8) -> Result<Self, RegisterError> {
        let csv_error = |source| RegisterError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_path(path)
            .map_err(csv_error)?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let key = headers
            .iter()
            .position(|h| h == KEY_COLUMN)
            .ok_or_else(|| RegisterError::MissingKeyColumn {
                path: path.to_path_buf(),
            })?;

        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(csv_error)?;

        Ok(Self {
            headers,
            key,
            records,
        })
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

fn field(record: &csv::StringRecord, index: Option<usize>) -> String {
    index
        .and_then(|i| record.get(i))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Errors reading or writing the register.
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    /// The file could not be read or written.
    #[error("Failed to access register {}: {source}", .path.display())]
    Io {
        /// Offending file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The file is not valid delimited text.
    #[error("Failed to parse register {}: {source}", .path.display())]
    Csv {
        /// Offending file.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// The header row has no `drawing_id` column.
    #[error("Register {} has no 'drawing_id' column in its header row", .path.display())]
    MissingKeyColumn {
        /// Offending file.
        path: PathBuf,
    },
}
