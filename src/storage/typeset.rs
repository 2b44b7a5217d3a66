//! Compiling report sources with an external LaTeX compiler.
//!
//! The compiler runs in the directory of each source. Afterwards the PDF is
//! moved to the result directory and auxiliary files to the build directory,
//! leaving the source directory clean.

use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
    process,
};

/// Suffixes of auxiliary files the compiler leaves behind.
pub const BUILD_ARTEFACTS: &[&str] = &[
    ".aux",
    ".log",
    ".out",
    ".toc",
    ".lof",
    ".lot",
    ".fls",
    ".fdb_latexmk",
    ".synctex.gz",
];

/// Something that turns a LaTeX source into a PDF next to it.
pub trait Typesetter {
    /// Compiles `source`, leaving `<stem>.pdf` in the same directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the compiler cannot be started or fails.
    fn compile(&self, source: &Path) -> Result<(), TypesetError>;
}

/// Runs a LaTeX compiler executable, `pdflatex` by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiler {
    program: String,
    runs: usize,
}

impl Compiler {
    /// Creates a compiler that runs `program` `runs` times per source.
    #[must_use]
    pub fn new(program: impl Into<String>, runs: usize) -> Self {
        Self {
            program: program.into(),
            runs: runs.max(1),
        }
    }
}

impl Typesetter for Compiler {
    fn compile(&self, source: &Path) -> Result<(), TypesetError> {
        let file_name = source
            .file_name()
            .ok_or_else(|| TypesetError::InvalidSource(source.to_path_buf()))?;
        let dir = source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        for run in 1..=self.runs {
            tracing::info!(
                "Running {} on {} ({run}/{})",
                self.program,
                source.display(),
                self.runs
            );
            let status = process::Command::new(&self.program)
                .args(["-interaction=nonstopmode", "-halt-on-error"])
                .arg(file_name)
                .current_dir(dir)
                .stdout(process::Stdio::null())
                .status()
                .map_err(|source_error| TypesetError::Spawn {
                    program: self.program.clone(),
                    source: source_error,
                })?;

            if !status.success() {
                return Err(TypesetError::Failed {
                    file: source.to_path_buf(),
                    status: status.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Where the outputs of one source ended up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outputs {
    /// The compiled PDF, if one was produced.
    pub pdf: Option<PathBuf>,
    /// Auxiliary files moved to the build directory.
    pub artefacts: Vec<PathBuf>,
}

/// Moves the PDF of `source` into `result_dir` and its auxiliary files into
/// `build_dir`.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or a file cannot be
/// moved.
pub fn move_outputs(
    source: &Path,
    result_dir: &Path,
    build_dir: &Path,
) -> Result<Outputs, TypesetError> {
    let stem = source
        .file_stem()
        .and_then(OsStr::to_str)
        .ok_or_else(|| TypesetError::InvalidSource(source.to_path_buf()))?;
    let dir = source
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    create_dir(result_dir)?;
    create_dir(build_dir)?;

    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|source| TypesetError::Io {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    let pdf_name = format!("{stem}.pdf");
    let mut outputs = Outputs::default();
    for path in entries {
        let Some(name) = path.file_name().and_then(OsStr::to_str) else {
            continue;
        };
        if name == pdf_name {
            let target = result_dir.join(name);
            move_file(&path, &target)?;
            outputs.pdf = Some(target);
        } else if BUILD_ARTEFACTS.iter().any(|suffix| name.ends_with(suffix)) {
            let target = build_dir.join(name);
            move_file(&path, &target)?;
            outputs.artefacts.push(target);
        }
    }

    Ok(outputs)
}

/// Compiles each source and moves its outputs.
///
/// Stops at the first source that fails.
///
/// # Errors
///
/// Returns the first compilation or file-moving error.
pub fn build(
    typesetter: &impl Typesetter,
    sources: &[PathBuf],
    result_dir: &Path,
    build_dir: &Path,
) -> Result<Vec<Outputs>, TypesetError> {
    sources
        .iter()
        .map(|source| {
            if !source.is_file() {
                return Err(TypesetError::InvalidSource(source.clone()));
            }
            typesetter.compile(source)?;
            move_outputs(source, result_dir, build_dir)
        })
        .collect()
}

fn create_dir(dir: &Path) -> Result<(), TypesetError> {
    fs::create_dir_all(dir).map_err(|source| TypesetError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn move_file(from: &Path, to: &Path) -> Result<(), TypesetError> {
    let io_error = |source| TypesetError::Io {
        path: from.to_path_buf(),
        source,
    };
    if fs::rename(from, to).is_err() {
        // rename fails across filesystems
        fs::copy(from, to).map_err(io_error)?;
        fs::remove_file(from).map_err(io_error)?;
    }
    tracing::debug!("Moved {} to {}", from.display(), to.display());
    Ok(())
}

/// Errors compiling report sources.
#[derive(Debug, thiserror::Error)]
pub enum TypesetError {
    /// The source is not an existing file.
    #[error("Report source {} is not a file", .0.display())]
    InvalidSource(PathBuf),

    /// The compiler could not be started.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        /// Compiler executable.
        program: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The compiler exited unsuccessfully.
    #[error("Compiling {} failed: {status}", .file.display())]
    Failed {
        /// Source being compiled.
        file: PathBuf,
        /// How the compiler exited.
        status: String,
    },

    /// Moving outputs failed.
    #[error("Failed to move outputs at {}: {source}", .path.display())]
    Io {
        /// Offending file or directory.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}
