//! Presentation groups and the total order of documents in a report.
//!
//! Documents are ordered by tank (general first, then tanks in numeric
//! order), then by [`Group`], then by a key that depends on the group.

use std::fmt;

use serde::Serialize;

use super::{Code, Document, Tank, category::Family, classifier::Classifier};

/// Element categories partitioned into structural blocks, in report order.
///
/// Categories not listed sort after every block.
pub const CATEGORY_BLOCKS: &[(&str, &[&str])] = &[
    ("Wall panels", &["11", "12", "13", "14", "19"]),
    ("Buttresses", &["41", "42", "43", "44"]),
    ("Roof", &["61", "62", "63", "64"]),
];

/// Section of a report a document is listed under, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    /// Plan views, sections and general arrangement (`10xx`).
    Plan,
    /// Element-based drawings.
    Elements,
    /// 3D models (`Mxxx`).
    Models,
    /// Documents, calculations and protocols (`Dxxx`, `Cxxx`, `Pxxx`).
    Documents,
    /// Everything else, including unclassifiable filenames.
    Other,
}

impl Group {
    /// Returns the heading shown above the group in reports.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Plan => "Plan views and sections",
            Self::Elements => "Element drawings",
            Self::Models => "3D models",
            Self::Documents => "Documents, calculations and protocols",
            Self::Other => "Other documents",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Orders tank partitions: general, then numeric tanks ascending, then
/// anything that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum TankKey {
    /// Project-wide documents.
    General,
    /// Tank number, with the verbatim token to separate `"2"` from `"02"`.
    Numbered(u64, String),
    /// Tank token too large to be a number.
    Named(String),
    /// No tank designation.
    Unknown,
}

impl TankKey {
    /// Builds the key for an optional tank.
    #[must_use]
    pub fn new(tank: Option<&Tank>) -> Self {
        match tank {
            Some(Tank::General) => Self::General,
            Some(Tank::Unit(token)) => token.parse().map_or_else(
                |_| Self::Named(token.clone()),
                |number| Self::Numbered(number, token.clone()),
            ),
            None => Self::Unknown,
        }
    }
}

/// Sort key giving the full deterministic order of a report.
///
/// Fields compare in declaration order. Fields a group does not use are
/// left at zero or empty so they never decide the order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    tank: TankKey,
    group: Group,
    block: usize,
    type_index: u32,
    position: usize,
    category: String,
    file_name: String,
}

/// Assigns groups and sort keys to documents.
#[derive(Debug, Clone, Copy)]
pub struct Sorter<'a> {
    classifier: Classifier<'a>,
}

impl Default for Sorter<'static> {
    fn default() -> Self {
        Self::new(Classifier::default())
    }
}

impl<'a> Sorter<'a> {
    /// Creates a sorter using the given classifier's registry.
    #[must_use]
    pub const fn new(classifier: Classifier<'a>) -> Self {
        Self { classifier }
    }

    /// Returns the presentation group of a document. First match wins.
    #[must_use]
    pub fn group(&self, document: &Document) -> Group {
        match document.code() {
            Some(Code::Numeric(code)) if code.category().starts_with("10") => Group::Plan,
            Some(Code::Numeric(code))
                if self
                    .classifier
                    .registry()
                    .numeric(code.category())
                    .is_some_and(|category| category.element_based) =>
            {
                Group::Elements
            }
            Some(code) => match Classifier::family(code) {
                Some(Family::Model) => Group::Models,
                Some(Family::Document | Family::Calculation | Family::Protocol) => {
                    Group::Documents
                }
                None => Group::Other,
            },
            None => Group::Other,
        }
    }

    /// Returns the sort key of a document.
    #[must_use]
    pub fn sort_key(&self, document: &Document) -> SortKey {
        let group = self.group(document);
        let mut key = SortKey {
            tank: TankKey::new(document.tank()),
            group,
            block: 0,
            type_index: 0,
            position: 0,
            category: String::new(),
            file_name: document.file_name().to_string(),
        };

        match (group, document.code()) {
            (Group::Elements, Some(Code::Numeric(code))) => {
                let (block, position) = block_position(code.category());
                key.block = block;
                key.type_index = code.type_index();
                key.position = position;
            }
            (Group::Other, Some(Code::Numeric(code))) => {
                key.category = code.category().to_string();
            }
            _ => {}
        }

        key
    }

    /// Sorts documents into report order.
    ///
    /// The key is computed once per document. Equal keys are impossible for
    /// distinct filenames, so the result does not depend on input order.
    pub fn sort(&self, documents: &mut [Document]) {
        documents.sort_by_cached_key(|document| self.sort_key(document));
    }
}

/// Returns `(block index, position in block)`, or `usize::MAX` for both
/// when the category is in no block.
fn block_position(category: &str) -> (usize, usize) {
    CATEGORY_BLOCKS
        .iter()
        .enumerate()
        .find_map(|(block_index, (_, block))| {
            block
                .iter()
                .position(|c| *c == category)
                .map(|position| (block_index, position))
        })
        .unwrap_or((usize::MAX, usize::MAX))
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut documents: Vec<_> = names.iter().map(|name| Document::new(*name)).collect();
        Sorter::default().sort(&mut documents);
        documents
            .iter()
            .map(|document| document.file_name().to_string())
            .collect()
    }

    #[test_case("AQ1-00-45-32-1001.pdf", Group::Plan; "plan")]
    #[test_case("AQ1-00-45-32-1102.pdf", Group::Elements; "element")]
    #[test_case("AQ1-00-45-32-M100.rvt", Group::Models; "model")]
    #[test_case("AQ1-00-45-32-D000.pdf", Group::Documents; "document")]
    #[test_case("AQ1-00-45-32-C110.pdf", Group::Documents; "calculation")]
    #[test_case("AQ1-00-45-32-P110.pdf", Group::Documents; "protocol")]
    #[test_case("AQ1-00-45-32-7001.pdf", Group::Other; "non element numeric")]
    #[test_case("AQ1-00-45-32-2001.pdf", Group::Other; "unknown numeric")]
    #[test_case("AQ1-00-45-32-X100.pdf", Group::Other; "unknown prefix")]
    #[test_case("notes.txt", Group::Other; "unclassifiable")]
    fn groups(file_name: &str, expected: Group) {
        assert_eq!(Sorter::default().group(&Document::new(file_name)), expected);
    }

    #[test]
    fn unregistered_letter_code_still_groups_by_prefix() {
        let document = Document::new("AQ1-00-45-32-M999.rvt");
        assert_eq!(Sorter::default().group(&document), Group::Models);
    }

    #[test]
    fn block_dominates_type() {
        // wall panel type 01 before roof type 00
        assert_eq!(
            sorted(&["AQ1-00-x-y-6100.pdf", "AQ1-00-x-y-1101.pdf"]),
            ["AQ1-00-x-y-1101.pdf", "AQ1-00-x-y-6100.pdf"]
        );
    }

    #[test]
    fn type_before_category_within_block() {
        assert_eq!(
            sorted(&[
                "AQ1-00-x-y-1302.pdf",
                "AQ1-00-x-y-1102.pdf",
                "AQ1-00-x-y-1301.pdf",
                "AQ1-00-x-y-1101.pdf",
            ]),
            [
                "AQ1-00-x-y-1101.pdf",
                "AQ1-00-x-y-1301.pdf",
                "AQ1-00-x-y-1102.pdf",
                "AQ1-00-x-y-1302.pdf",
            ]
        );
    }

    #[test]
    fn type_is_numeric_not_lexical() {
        assert_eq!(
            sorted(&["AQ1-00-x-y-1110.pdf", "AQ1-00-x-y-1102.pdf"]),
            ["AQ1-00-x-y-1102.pdf", "AQ1-00-x-y-1110.pdf"]
        );
    }

    #[test]
    fn unblocked_categories_sort_last_by_type_then_name() {
        assert_eq!(
            sorted(&[
                "AQ1-00-x-y-9202.pdf",
                "AQ1-00-x-y-9101.pdf",
                "AQ1-00-x-y-6199.pdf",
                "AQ1-00-x-y-9201.pdf",
            ]),
            [
                "AQ1-00-x-y-6199.pdf",
                "AQ1-00-x-y-9101.pdf",
                "AQ1-00-x-y-9201.pdf",
                "AQ1-00-x-y-9202.pdf",
            ]
        );
    }

    #[test]
    fn groups_in_order() {
        assert_eq!(
            sorted(&[
                "AQ1-00-x-y-notes.pdf",
                "AQ1-00-x-y-D000.pdf",
                "AQ1-00-x-y-M100.rvt",
                "AQ1-00-x-y-1102.pdf",
                "AQ1-00-x-y-1001.pdf",
            ]),
            [
                "AQ1-00-x-y-1001.pdf",
                "AQ1-00-x-y-1102.pdf",
                "AQ1-00-x-y-M100.rvt",
                "AQ1-00-x-y-D000.pdf",
                "AQ1-00-x-y-notes.pdf",
            ]
        );
    }

    #[test]
    fn tanks_partition_before_groups() {
        assert_eq!(
            sorted(&[
                "AQ1-10-x-y-1001.pdf",
                "AQ1-02-x-y-1001.pdf",
                "AQ1-00-x-y-D000.pdf",
                "AQ1.pdf",
                "AQ1-00-x-y-1102.pdf",
            ]),
            [
                "AQ1-00-x-y-1102.pdf",
                "AQ1-00-x-y-D000.pdf",
                "AQ1-02-x-y-1001.pdf",
                "AQ1-10-x-y-1001.pdf",
                "AQ1.pdf",
            ]
        );
    }

    #[test]
    fn other_group_orders_numeric_by_category() {
        assert_eq!(
            sorted(&[
                "B-00-x-y-7100.pdf",
                "A-00-x-y-7300.pdf",
                "A-00-x-y-5000.pdf",
            ]),
            ["A-00-x-y-5000.pdf", "B-00-x-y-7100.pdf", "A-00-x-y-7300.pdf"]
        );
    }

    #[test]
    fn sorting_is_idempotent_and_input_order_independent() {
        let names = [
            "AQ1-00-x-y-1302.pdf",
            "AQ1-02-x-y-M100.rvt",
            "AQ1-00-x-y-4101.pdf",
            "AQ1-00-x-y-C110.pdf",
            "AQ1-00-x-y-1101.pdf",
            "stray.pdf",
        ];
        let once = sorted(&names);
        let refs: Vec<&str> = once.iter().map(String::as_str).collect();
        assert_eq!(sorted(&refs), once);

        let mut reversed = names;
        reversed.reverse();
        assert_eq!(sorted(&reversed), once);
    }

    #[test]
    fn tank_key_order() {
        let general = TankKey::new(Some(&Tank::General));
        let two = TankKey::new(Some(&Tank::Unit("2".to_string())));
        let ten = TankKey::new(Some(&Tank::Unit("10".to_string())));
        let unknown = TankKey::new(None);
        assert!(general < two);
        assert!(two < ten);
        assert!(ten < unknown);
    }

    #[test]
    fn plan_keys_before_elements() {
        let sorter = Sorter::default();
        let plan = Document::new("AQ1-00-x-y-1001.pdf");
        let element = Document::new("AQ1-00-x-y-1102.pdf");
        assert!(sorter.sort_key(&plan) < sorter.sort_key(&element));
    }
}
