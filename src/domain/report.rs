//! Assembly of report rows from a document listing.
//!
//! This is the filesystem-agnostic half of report generation: filtering by
//! package, ordering, revision lookup and header rows. Rendering lives in
//! [`crate::storage::latex`].

use std::{collections::HashMap, fmt};

use super::{
    Document, Package, Tank,
    classifier::Classifier,
    ordering::{Group, Sorter, TankKey},
};

/// Shown in place of revision metadata that is unknown or blank.
pub const PLACEHOLDER: &str = "-";

/// Revision metadata for one document, as recorded in the register.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionEntry {
    /// Revision letter or number.
    pub rev: String,
    /// Date of issue, free text.
    pub issue_date: String,
    /// Issue status, free text.
    pub status: String,
}

/// Read access to revision metadata keyed by base identifier.
pub trait RevisionLookup {
    /// Returns the entry for `id`, if the register has one.
    fn revision(&self, id: &str) -> Option<&RevisionEntry>;
}

impl RevisionLookup for HashMap<String, RevisionEntry> {
    fn revision(&self, id: &str) -> Option<&RevisionEntry> {
        self.get(id)
    }
}

/// Which documents a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Selection {
    /// Documents issued to one audience.
    Package(Package),
    /// Every document, including unclassifiable ones.
    All,
}

impl Selection {
    /// Returns the key used to name the output file.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Package(package) => package.key(),
            Self::All => "all",
        }
    }

    /// Returns the report title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Package(package) => package.title(),
            Self::All => "All documents",
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One listed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    /// Base identifier.
    pub id: String,
    /// Classifier description.
    pub description: String,
    /// Revision, or [`PLACEHOLDER`].
    pub rev: String,
    /// Issue date, or [`PLACEHOLDER`].
    pub issue_date: String,
    /// Status, or [`PLACEHOLDER`].
    pub status: String,
}

/// A row of a report table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Start of a tank partition.
    Section(String),
    /// Start of a presentation group within a partition.
    Group(Group),
    /// A document.
    Entry(EntryRow),
}

/// An assembled report, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Which documents the report covers.
    pub selection: Selection,
    /// Rows in output order.
    pub rows: Vec<Row>,
}

impl Report {
    /// Returns the number of documents listed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row, Row::Entry(_)))
            .count()
    }

    /// Returns `true` if no documents are listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Returns the section heading for a tank partition.
#[must_use]
pub fn section_heading(tank: Option<&Tank>) -> String {
    tank.map_or_else(|| "Unassigned".to_string(), Tank::heading)
}

/// Builds reports from a document listing.
#[derive(Debug, Clone, Copy)]
pub struct Assembler<'a> {
    classifier: Classifier<'a>,
    sorter: Sorter<'a>,
}

impl Default for Assembler<'static> {
    fn default() -> Self {
        Self::new(Classifier::default())
    }
}

impl<'a> Assembler<'a> {
    /// Creates an assembler over the given classifier.
    #[must_use]
    pub const fn new(classifier: Classifier<'a>) -> Self {
        Self {
            classifier,
            sorter: Sorter::new(classifier),
        }
    }

    /// Returns the documents a selection covers, in report order.
    #[must_use]
    pub fn select(&self, documents: &[Document], selection: Selection) -> Vec<Document> {
        let mut selected: Vec<Document> = documents
            .iter()
            .filter(|document| match selection {
                Selection::Package(package) => self.classifier.classify(document).is_in(package),
                Selection::All => true,
            })
            .cloned()
            .collect();
        self.sorter.sort(&mut selected);
        selected
    }

    /// Assembles the report for a selection.
    ///
    /// A section row is emitted whenever the tank partition changes and a
    /// group row whenever the group changes within a partition.
    #[must_use]
    pub fn assemble(
        &self,
        documents: &[Document],
        selection: Selection,
        register: &impl RevisionLookup,
    ) -> Report {
        let mut rows = Vec::new();
        let mut current: Option<(TankKey, Group)> = None;

        for document in self.select(documents, selection) {
            let tank = TankKey::new(document.tank());
            let group = self.sorter.group(&document);

            let new_section = current.as_ref().is_none_or(|(t, _)| *t != tank);
            if new_section {
                rows.push(Row::Section(section_heading(document.tank())));
            }
            if new_section || current.as_ref().is_some_and(|(_, g)| *g != group) {
                rows.push(Row::Group(group));
            }
            current = Some((tank, group));

            rows.push(Row::Entry(self.entry(&document, register)));
        }

        Report { selection, rows }
    }

    fn entry(&self, document: &Document, register: &impl RevisionLookup) -> EntryRow {
        let id = document.base_id();
        let revision = register.revision(id);
        if revision.is_none() {
            tracing::debug!("No register entry for {id}");
        }
        let field = |value: Option<&String>| {
            value
                .filter(|v| !v.trim().is_empty())
                .map_or_else(|| PLACEHOLDER.to_string(), |v| v.trim().to_string())
        };

        EntryRow {
            id: id.to_string(),
            description: self.classifier.classify(document).description,
            rev: field(revision.map(|r| &r.rev)),
            issue_date: field(revision.map(|r| &r.issue_date)),
            status: field(revision.map(|r| &r.status)),
        }
    }
}
