use std::path::Path;

use super::{Code, Tank};

/// A document found in the documents folder, described by its filename.
///
/// Everything here is derived from the filename alone. Nothing is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    file_name: String,
    code: Option<Code>,
    tank: Option<Tank>,
}

impl Document {
    /// Parses a document from its filename (not a full path).
    #[must_use]
    pub fn new(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let code = Code::from_filename(&file_name);
        let tank = Tank::from_filename(&file_name);
        if code.is_none() {
            tracing::debug!("Unclassifiable filename: {file_name}");
        }
        Self {
            file_name,
            code,
            tank,
        }
    }

    /// Returns the raw filename.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the filename without its extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }

    /// Returns the parsed code, or `None` if the filename is unclassifiable.
    #[must_use]
    pub const fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    /// Returns the tank designation, or `None` if it cannot be parsed.
    #[must_use]
    pub const fn tank(&self) -> Option<&Tank> {
        self.tank.as_ref()
    }

    /// Returns the identifier used as the register key and shown in reports.
    ///
    /// This is the stem with any `_`-suffix removed from its final
    /// dash-separated segment.
    ///
    /// ```
    /// use drawreg::domain::Document;
    ///
    /// let document = Document::new("AQ1-00-45-32-1103_Concrete_layout.pdf");
    /// assert_eq!(document.base_id(), "AQ1-00-45-32-1103");
    /// ```
    #[must_use]
    pub fn base_id(&self) -> &str {
        let stem = self.stem();
        let block_start = stem.rfind('-').map_or(0, |i| i + 1);
        match stem[block_start..].find('_') {
            Some(offset) => &stem[..block_start + offset],
            None => stem,
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("AQ1-00-45-32-1102.pdf", "AQ1-00-45-32-1102"; "no suffix")]
    #[test_case("AQ1-00-45-32-1103_Concrete_layout.pdf", "AQ1-00-45-32-1103"; "suffix")]
    #[test_case("AQ_1-00-45-32-1103.pdf", "AQ_1-00-45-32-1103"; "underscore in earlier segment")]
    #[test_case("report_final.pdf", "report"; "no dashes")]
    #[test_case("AQ1-00-45-32-1103_a_b.tex", "AQ1-00-45-32-1103"; "first underscore wins")]
    fn base_id(file_name: &str, expected: &str) {
        assert_eq!(Document::new(file_name).base_id(), expected);
    }

    #[test]
    fn record_fields() {
        let document = Document::new("AQ1-02-45-32-1102.PDF");
        assert_eq!(document.stem(), "AQ1-02-45-32-1102");
        assert_eq!(document.code().unwrap().as_str(), "1102");
        assert_eq!(document.tank(), Some(&Tank::Unit("02".to_string())));
    }

    #[test]
    fn unclassifiable_document() {
        let document = Document::new("notes.txt");
        assert!(document.code().is_none());
        assert!(document.tank().is_none());
        assert_eq!(document.base_id(), "notes");
    }
}
