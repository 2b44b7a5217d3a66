use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::Package;

/// Configuration for generating drawing registers.
///
/// Every setting has a default, so a missing configuration file is the same
/// as an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Versions")]
pub struct Config {
    /// Field delimiter of the revision register.
    ///
    /// Semicolon by default, which is what spreadsheet software uses in
    /// locales with a decimal comma.
    delimiter: u8,

    /// File extensions (without the dot, lower case) considered documents.
    extensions: Vec<String>,

    /// Packages to render a list for.
    pub packages: Vec<Package>,

    /// Whether to also render a list of every document, including
    /// unclassifiable ones.
    pub catch_all: bool,

    /// Prefix of the generated list files, e.g. `document_list` produces
    /// `document_list_for_client.tex`.
    pub output_prefix: String,

    /// LaTeX report sources compiled by the build command.
    pub reports: Vec<PathBuf>,

    /// The document compiler executable.
    pub compiler: String,

    /// How many times each report is compiled, to settle cross references.
    pub runs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: b';',
            extensions: default_extensions(),
            packages: Package::ALL.to_vec(),
            catch_all: false,
            output_prefix: default_output_prefix(),
            reports: Vec::new(),
            compiler: default_compiler(),
            runs: default_runs(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the configuration if the file exists, or returns the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Returns the register delimiter.
    #[must_use]
    pub const fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Sets the register delimiter.
    ///
    /// # Errors
    ///
    /// Returns an error unless `delimiter` is a single ASCII character other
    /// than a quote or a line break.
    pub fn set_delimiter(&mut self, delimiter: &str) -> Result<(), ConfigError> {
        self.delimiter = parse_delimiter(delimiter)?;
        Ok(())
    }

    /// Checks if an extension (with or without case) is a document extension.
    #[must_use]
    pub fn is_document_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }

    /// Returns the file name of the list generated for `key`.
    #[must_use]
    pub fn output_file_name(&self, key: &str) -> String {
        format!("{}_{key}.tex", self.output_prefix)
    }
}

fn parse_delimiter(delimiter: &str) -> Result<u8, ConfigError> {
    match delimiter.as_bytes() {
        [byte] if byte.is_ascii() && !matches!(*byte, b'"' | b'\n' | b'\r') => Ok(*byte),
        _ => Err(ConfigError::Delimiter(delimiter.to_string())),
    }
}

fn default_extensions() -> Vec<String> {
    ["pdf", "tex", "rvt"].map(String::from).to_vec()
}

fn default_delimiter() -> String {
    ";".to_string()
}

fn default_packages() -> Vec<Package> {
    Package::ALL.to_vec()
}

fn default_output_prefix() -> String {
    "document_list".to_string()
}

fn default_compiler() -> String {
    "pdflatex".to_string()
}

const fn default_runs() -> usize {
    2
}

/// Errors reading, parsing or writing the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        /// Offending file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid configuration.
    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// The delimiter is not a single ASCII character, or clashes with quoting
    /// or record separation.
    #[error("Invalid delimiter {0:?}: expected a single ASCII character other than a quote or line break")]
    Delimiter(String),
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_delimiter")]
        delimiter: String,

        #[serde(default = "default_extensions")]
        extensions: Vec<String>,

        #[serde(default = "default_packages")]
        packages: Vec<Package>,

        #[serde(default)]
        catch_all: bool,

        #[serde(default = "default_output_prefix")]
        output_prefix: String,

        #[serde(default)]
        reports: Vec<PathBuf>,

        #[serde(default = "default_compiler")]
        compiler: String,

        #[serde(default = "default_runs")]
        runs: usize,
    },
}

impl TryFrom<Versions> for Config {
    type Error = ConfigError;

    fn try_from(versions: Versions) -> Result<Self, Self::Error> {
        match versions {
            Versions::V1 {
                delimiter,
                extensions,
                packages,
                catch_all,
                output_prefix,
                reports,
                compiler,
                runs,
            } => Ok(Self {
                delimiter: parse_delimiter(&delimiter)?,
                extensions: extensions
                    .into_iter()
                    .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                    .collect(),
                packages,
                catch_all,
                output_prefix,
                reports,
                compiler,
                runs,
            }),
        }
    }
}
