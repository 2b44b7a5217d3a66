use std::{fmt, path::Path, str::FromStr};

/// Placeholder shown wherever a filename cannot be classified.
pub const UNCLASSIFIED: &str = "N/A";

/// A four-digit drawing code (`DDTT`).
///
/// The first two digits are the category, the last two the type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumericCode(String);

impl NumericCode {
    /// Returns the two-digit category, e.g. `"11"` for `"1102"`.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.0[..2]
    }

    /// Returns the two-digit type, leading zero preserved (`"02"`).
    #[must_use]
    pub fn type_code(&self) -> &str {
        &self.0[2..]
    }

    /// Returns the type as an integer so that `"02"` orders before `"10"`.
    #[must_use]
    pub fn type_index(&self) -> u32 {
        self.type_code()
            .bytes()
            .fold(0, |acc, digit| acc * 10 + u32::from(digit - b'0'))
    }

    /// Returns the full code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A letter-prefixed document code (`LDDD`), always upper case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlphanumericCode(String);

impl AlphanumericCode {
    /// Returns the letter prefix, e.g. `'D'` for `"D000"`.
    #[must_use]
    pub fn prefix(&self) -> char {
        // constructed only from an ASCII letter followed by three digits
        char::from(self.0.as_bytes()[0])
    }

    /// Returns the full code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The classification token parsed out of a filename.
///
/// Format, taken from the last dash-separated segment of the file stem with
/// any `_`-suffix removed:
/// - `DDTT`: four digits, e.g. `1102`
/// - `LDDD`: one letter and three digits, e.g. `D000`
///
/// Codes are classification keys, not document identifiers. Many documents
/// share the same code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Code {
    /// Numeric drawing code.
    Numeric(NumericCode),
    /// Letter-prefixed document code.
    Alphanumeric(AlphanumericCode),
}

impl Code {
    /// Extracts the code from a filename.
    ///
    /// Returns `None` when the filename has no recognisable code. Nothing is
    /// guessed or corrected.
    ///
    /// ```
    /// use drawreg::domain::Code;
    ///
    /// let code = Code::from_filename("AQ430773-00-45-32-1103_Concrete_layout.pdf").unwrap();
    /// assert_eq!(code.as_str(), "1103");
    /// assert!(Code::from_filename("foo-bar.pdf").is_none());
    /// ```
    #[must_use]
    pub fn from_filename(filename: &str) -> Option<Self> {
        let stem = Path::new(filename).file_stem()?.to_str()?;
        let block = stem.rsplit('-').next()?;
        let candidate = block.split('_').next()?;

        match candidate.parse() {
            Ok(code) => Some(code),
            Err(e) => {
                tracing::trace!("No code in {filename}: {e}");
                None
            }
        }
    }

    /// Returns the full code string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Numeric(code) => code.as_str(),
            Self::Alphanumeric(code) => code.as_str(),
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a token is not a valid code.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// Token is not four characters long.
    #[error("Invalid code '{0}': expected 4 characters")]
    Length(String),

    /// Token has the right length but neither the `DDTT` nor the `LDDD` shape.
    #[error("Invalid code '{0}': expected four digits or one letter followed by three digits")]
    Shape(String),
}

impl FromStr for Code {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().count() != 4 {
            return Err(Error::Length(s.to_string()));
        }

        let mut chars = s.chars();
        let first = chars.next().ok_or_else(|| Error::Length(s.to_string()))?;
        if !chars.all(|c| c.is_ascii_digit()) {
            return Err(Error::Shape(s.to_string()));
        }

        if first.is_ascii_digit() {
            Ok(Self::Numeric(NumericCode(s.to_string())))
        } else if first.is_ascii_alphabetic() {
            Ok(Self::Alphanumeric(AlphanumericCode(s.to_ascii_uppercase())))
        } else {
            Err(Error::Shape(s.to_string()))
        }
    }
}

/// Extracts the code from a filename, or `None` if it is unclassifiable.
#[must_use]
pub fn extract_code(filename: &str) -> Option<Code> {
    Code::from_filename(filename)
}

/// The unit a document belongs to, taken from the second dash-separated
/// segment of the filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tank {
    /// Project-wide documents (token `00`).
    General,
    /// A specific tank, token kept verbatim (e.g. `"02"`).
    Unit(String),
}

impl Tank {
    /// Parses the tank designation from the whole filename.
    ///
    /// The filename is split as-is, extension included, so a name with only
    /// two segments carries the extension in its tank token and is rejected.
    #[must_use]
    pub fn from_filename(filename: &str) -> Option<Self> {
        let token = filename.split('-').nth(1)?;
        match token {
            "00" => Some(Self::General),
            t if !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()) => {
                Some(Self::Unit(t.to_string()))
            }
            _ => None,
        }
    }

    /// Returns the section heading used in reports.
    #[must_use]
    pub fn heading(&self) -> String {
        match self {
            Self::General => "General".to_string(),
            Self::Unit(token) => format!("Tank {token}"),
        }
    }
}

impl fmt::Display for Tank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::General => f.write_str("General"),
            Self::Unit(token) => f.write_str(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("AQ430773-00-45-32-1102.pdf", "1102"; "numeric code")]
    #[test_case("AQ430773-00-45-32-1103_Concrete_layout.pdf", "1103"; "suffix stripped")]
    #[test_case("x-y-d000.pdf", "D000"; "letter upper cased")]
    #[test_case("AQ1-00-x-y-M100.rvt", "M100"; "model code")]
    #[test_case("1001.pdf", "1001"; "no dashes")]
    fn extracts_code(filename: &str, expected: &str) {
        assert_eq!(extract_code(filename).unwrap().as_str(), expected);
    }

    #[test]
    fn dash_inside_suffix_hides_code() {
        // the last dash segment is "b_c", not the code
        assert!(extract_code("AQ1-00-x-y-1003_a-b_c.tex").is_none());
    }

    #[test_case("foo-bar.pdf"; "word")]
    #[test_case("AQ1-00-x-y-110.pdf"; "too short")]
    #[test_case("AQ1-00-x-y-11023.pdf"; "five digits")]
    #[test_case("AQ1-00-x-y-11A2.pdf"; "letter inside digits")]
    #[test_case("AQ1-00-x-y-DD00.pdf"; "two letters")]
    #[test_case("AQ1-00-x-y-_1102.pdf"; "empty before underscore")]
    #[test_case(".pdf"; "empty stem")]
    #[test_case(""; "empty filename")]
    #[test_case("AQ1-00-x-y-#102.pdf"; "symbol prefix")]
    fn rejects_malformed(filename: &str) {
        assert!(extract_code(filename).is_none());
    }

    #[test]
    fn numeric_parts() {
        let Some(Code::Numeric(code)) = extract_code("AQ1-00-45-32-1102.pdf") else {
            panic!("expected numeric code");
        };
        assert_eq!(code.category(), "11");
        assert_eq!(code.type_code(), "02");
        assert_eq!(code.type_index(), 2);
    }

    #[test]
    fn type_index_orders_numerically() {
        let two: Code = "1102".parse().unwrap();
        let ten: Code = "1110".parse().unwrap();
        let (Code::Numeric(two), Code::Numeric(ten)) = (two, ten) else {
            panic!("expected numeric codes");
        };
        assert!(two.type_index() < ten.type_index());
    }

    #[test]
    fn alphanumeric_prefix() {
        let Some(Code::Alphanumeric(code)) = extract_code("x-y-c110.pdf") else {
            panic!("expected alphanumeric code");
        };
        assert_eq!(code.prefix(), 'C');
        assert_eq!(code.as_str(), "C110");
    }

    #[test]
    fn parse_errors() {
        assert_eq!("12".parse::<Code>(), Err(Error::Length("12".to_string())));
        assert_eq!(
            "1a23".parse::<Code>(),
            Err(Error::Shape("1a23".to_string()))
        );
        assert_eq!(
            format!("{}", Error::Length("12".to_string())),
            "Invalid code '12': expected 4 characters"
        );
    }

    #[test_case("AQ1-00-x-y-z.pdf", Some(Tank::General); "general")]
    #[test_case("AQ1-02-x-y-z.pdf", Some(Tank::Unit("02".to_string())); "tank two")]
    #[test_case("AQ1-12-x-y-z.pdf", Some(Tank::Unit("12".to_string())); "tank twelve")]
    #[test_case("AQ1.pdf", None; "single segment")]
    #[test_case("AQ1-TX-x-y-z.pdf", None; "non numeric token")]
    #[test_case("AQ1--x-y-z.pdf", None; "empty token")]
    #[test_case("AQ1-02.pdf", None; "extension kept in tank token")]
    fn parses_tank(filename: &str, expected: Option<Tank>) {
        assert_eq!(Tank::from_filename(filename), expected);
    }

    #[test]
    fn tank_and_code_parse_independently() {
        // Tank token carries the extension, the code parse strips it.
        assert_eq!(Tank::from_filename("AQ1-1102.pdf"), None);
        assert_eq!(extract_code("AQ1-1102.pdf").unwrap().as_str(), "1102");
    }

    #[test]
    fn tank_heading() {
        assert_eq!(Tank::General.heading(), "General");
        assert_eq!(Tank::Unit("02".to_string()).heading(), "Tank 02");
        assert_eq!(Tank::Unit("02".to_string()).to_string(), "02");
    }
}
