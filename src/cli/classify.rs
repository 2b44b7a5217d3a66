use std::path::PathBuf;

use clap::Parser;
use drawreg::{
    Classifier, Config, Document, Package, Sorter,
    domain::{Group, UNCLASSIFIED},
    storage::scan_documents,
};
use regex::Regex;
use serde::Serialize;
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Clone, Parser)]
#[command(about = "Show how each document is classified")]
pub struct Classify {
    /// Folder containing the drawing and document files
    #[arg(short, long, default_value = ".")]
    documents_dir: PathBuf,

    /// Only show documents issued to this package
    #[arg(long, value_name = "PACKAGE")]
    package: Option<Package>,

    /// Only show documents whose filename matches this pattern
    #[arg(long, value_name = "PATTERN")]
    regex: Option<Regex>,

    /// Only show documents without a recognised code
    #[arg(long)]
    unclassified: bool,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct Entry {
    file_name: String,
    code: Option<String>,
    tank: Option<String>,
    group: Group,
    description: String,
    packages: Vec<Package>,
}

impl Classify {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let entries = self.entries(scan_documents(&self.documents_dir, config));

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
            OutputFormat::Table => Self::output_table(&entries),
        }
        Ok(())
    }

    fn entries(&self, mut documents: Vec<Document>) -> Vec<Entry> {
        let classifier = Classifier::default();
        let sorter = Sorter::new(classifier);
        sorter.sort(&mut documents);

        documents
            .iter()
            .filter(|document| {
                self.regex
                    .as_ref()
                    .is_none_or(|regex| regex.is_match(document.file_name()))
            })
            .filter_map(|document| {
                let classification = classifier.classify(document);
                if self.unclassified && classification.description != UNCLASSIFIED {
                    return None;
                }
                if self
                    .package
                    .is_some_and(|package| !classification.is_in(package))
                {
                    return None;
                }
                Some(Entry {
                    file_name: document.file_name().to_string(),
                    code: document.code().map(|code| code.to_string()),
                    tank: document.tank().map(ToString::to_string),
                    group: sorter.group(document),
                    description: classification.description,
                    packages: classification.packages.into_iter().collect(),
                })
            })
            .collect()
    }

    fn output_table(entries: &[Entry]) {
        if entries.is_empty() {
            println!("No matching documents.");
            return;
        }

        if is_narrow() {
            for entry in entries {
                println!("{}", entry.file_name);
                println!("  {}", entry.description.dim());
            }
            return;
        }

        let width = entries
            .iter()
            .map(|entry| entry.file_name.len())
            .max()
            .unwrap_or_default();

        println!(
            "{}",
            format!(
                "{:<width$}  {:<5}  {:<7}  {:<8}  {}",
                "File", "Code", "Tank", "Packages", "Description"
            )
            .dim()
        );
        for entry in entries {
            let packages = Package::ALL
                .iter()
                .map(|package| {
                    if entry.packages.contains(package) {
                        package_initial(*package)
                    } else {
                        '.'
                    }
                })
                .collect::<String>();
            let description = if entry.description == UNCLASSIFIED {
                entry.description.warning()
            } else {
                entry.description.clone()
            };
            println!(
                "{:<width$}  {:<5}  {:<7}  {:<8}  {}",
                entry.file_name,
                entry.code.as_deref().unwrap_or(UNCLASSIFIED),
                entry.tank.as_deref().unwrap_or("-"),
                packages.info(),
                description
            );
        }
    }
}

const fn package_initial(package: Package) -> char {
    match package {
        Package::ForClient => 'C',
        Package::ForManufacture => 'M',
        Package::ForInstallation => 'I',
    }
}
