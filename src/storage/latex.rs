//! LaTeX rendering of assembled reports.

use std::{
    io,
    path::{Path, PathBuf},
};

use crate::domain::{
    Assembler, Config, Document, Package, RevisionLookup, Selection,
    report::{Report, Row},
};

const COLUMNS: usize = 5;

/// Escapes characters with a special meaning in LaTeX.
///
/// ```
/// use drawreg::storage::latex::escape;
///
/// assert_eq!(escape("AQ1-00_x & 50%"), r"AQ1-00\_x \& 50\%");
/// ```
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\\' => escaped.push_str(r"\textbackslash{}"),
            '~' => escaped.push_str(r"\textasciitilde{}"),
            '^' => escaped.push_str(r"\textasciicircum{}"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders a report as a LaTeX `longtable`.
#[must_use]
pub fn render(report: &Report) -> String {
    let mut lines = vec![
        "% Auto-generated file - do not edit manually".to_string(),
        format!(
            "\\section*{{Document list: {}}}",
            escape(report.selection.title())
        ),
        "\\begin{longtable}{p{0.28\\textwidth} p{0.40\\textwidth} c c c}".to_string(),
        "\\toprule".to_string(),
        "\\textbf{Drawing ID} & \\textbf{Description} & \\textbf{Rev} & \\textbf{Issue date} & \\textbf{Status} \\\\".to_string(),
        "\\midrule".to_string(),
        "\\endhead".to_string(),
    ];
    lines.extend(report.rows.iter().map(render_row));
    lines.push("\\bottomrule".to_string());
    lines.push("\\end{longtable}".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_row(row: &Row) -> String {
    match row {
        Row::Section(heading) => format!(
            "\\multicolumn{{{COLUMNS}}}{{l}}{{\\textbf{{{}}}}} \\\\",
            escape(heading)
        ),
        Row::Group(group) => format!(
            "\\multicolumn{{{COLUMNS}}}{{l}}{{\\textit{{{}}}}} \\\\",
            escape(group.title())
        ),
        Row::Entry(entry) => format!(
            "{} & {} & {} & {} & {} \\\\",
            escape(&entry.id),
            escape(&entry.description),
            escape(&entry.rev),
            escape(&entry.issue_date),
            escape(&entry.status),
        ),
    }
}

/// A list file that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    /// Which documents the list covers.
    pub selection: Selection,
    /// Where the list was written.
    pub path: PathBuf,
    /// Number of documents listed.
    pub documents: usize,
}

/// Returns the selections to render for a configuration.
#[must_use]
pub fn selections(config: &Config) -> Vec<Selection> {
    let mut selections: Vec<Selection> = Package::ALL
        .into_iter()
        .filter(|package| config.packages.contains(package))
        .map(Selection::Package)
        .collect();
    if config.catch_all {
        selections.push(Selection::All);
    }
    selections
}

/// Renders and writes one list per configured selection into `output_dir`.
///
/// Selections with no documents are skipped and no file is written for
/// them. Every table is rendered before the first file is written.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created or a file
/// cannot be written.
pub fn write_reports(
    documents: &[Document],
    register: &impl RevisionLookup,
    assembler: &Assembler,
    config: &Config,
    output_dir: &Path,
) -> Result<Vec<Written>, RenderError> {
    let rendered: Vec<(Written, String)> = selections(config)
        .into_iter()
        .filter_map(|selection| {
            let report = assembler.assemble(documents, selection, register);
            if report.is_empty() {
                tracing::info!("No documents for {selection}, skipping");
                return None;
            }
            let written = Written {
                selection,
                path: output_dir.join(config.output_file_name(selection.key())),
                documents: report.len(),
            };
            Some((written, render(&report)))
        })
        .collect();

    if rendered.is_empty() {
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(output_dir).map_err(|source| RenderError {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(rendered.len());
    for (file, content) in rendered {
        std::fs::write(&file.path, content).map_err(|source| RenderError {
            path: file.path.clone(),
            source,
        })?;
        tracing::info!(
            "Wrote {} documents to {}",
            file.documents,
            file.path.display()
        );
        written.push(file);
    }

    Ok(written)
}

/// A rendered list could not be written.
#[derive(Debug, thiserror::Error)]
#[error("Failed to write {}: {source}", .path.display())]
pub struct RenderError {
    /// Offending file or directory.
    pub path: PathBuf,
    /// Underlying I/O error.
    pub source: io::Error,
}
