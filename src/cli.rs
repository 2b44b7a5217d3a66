use std::path::{Path, PathBuf};

mod build;
mod classify;
mod generate;
mod sync;
mod terminal;

use anyhow::Context;
use build::Build;
use clap::ArgAction;
use classify::Classify;
use drawreg::{Config, Document, Register, storage::scan_documents};
use generate::Generate;
use sync::Sync;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, default_value = "dreg.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = Config::load_or_default(&self.config)?;

        self.command
            .unwrap_or_else(|| Command::Generate(Generate::default()))
            .run(config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Render one document list per package (default)
    Generate(Generate),

    /// Bring the revision register in line with the documents folder
    ///
    /// Adds a row for every new document and marks rows whose document is
    /// gone. Existing revision values are kept.
    Sync(Sync),

    /// Show how each document is classified
    Classify(Classify),

    /// Render the lists, then compile the report sources into PDFs
    Build(Build),
}

impl Command {
    fn run(self, config: Config) -> anyhow::Result<()> {
        match self {
            Self::Generate(command) => command.run(config)?,
            Self::Sync(command) => command.run(config)?,
            Self::Classify(command) => command.run(&config)?,
            Self::Build(command) => command.run(config)?,
        }
        Ok(())
    }
}

/// Where to find the documents and their revision register.
#[derive(Debug, Clone, clap::Args)]
pub struct Sources {
    /// Folder containing the drawing and document files
    #[arg(short, long, default_value = ".")]
    documents_dir: PathBuf,

    /// Revision register [default: <DOCUMENTS_DIR>/revisions.csv]
    #[arg(long, value_name = "FILE")]
    revisions: Option<PathBuf>,

    /// Register field delimiter, overriding the configuration
    #[arg(long, value_name = "CHAR")]
    delimiter: Option<String>,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("."),
            revisions: None,
            delimiter: None,
        }
    }
}

impl Sources {
    #[cfg(test)]
    fn new(documents_dir: impl Into<PathBuf>) -> Self {
        Self {
            documents_dir: documents_dir.into(),
            ..Self::default()
        }
    }

    fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    fn revisions(&self) -> PathBuf {
        self.revisions
            .clone()
            .unwrap_or_else(|| self.documents_dir.join("revisions.csv"))
    }

    /// Applies command-line overrides to the configuration.
    fn configure(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(delimiter) = &self.delimiter {
            config.set_delimiter(delimiter)?;
        }
        Ok(())
    }

    fn documents(&self, config: &Config) -> Vec<Document> {
        let documents = scan_documents(&self.documents_dir, config);
        tracing::info!(
            "Found {} documents in {}",
            documents.len(),
            self.documents_dir.display()
        );
        documents
    }

    fn register(&self, config: &Config) -> anyhow::Result<Register> {
        let path = self.revisions();
        Register::load(&path, config.delimiter())
            .with_context(|| format!("Failed to load revisions from {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), "").unwrap();
        }
    }

    #[test]
    fn generate_is_the_default_command() {
        let cli = Cli::try_parse_from(["dreg"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["dreg", "-vv", "sync", "--documents-dir", "docs"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Command::Sync(_))));
    }

    #[test]
    fn revisions_default_next_to_documents() {
        let sources = Sources::new("docs");
        assert_eq!(sources.revisions(), Path::new("docs").join("revisions.csv"));
    }

    #[test]
    fn delimiter_flag_overrides_config() {
        let sources = Sources {
            delimiter: Some(",".to_string()),
            ..Sources::new(".")
        };
        let mut config = Config::default();
        sources.configure(&mut config).unwrap();
        assert_eq!(config.delimiter(), b',');

        let sources = Sources {
            delimiter: Some("::".to_string()),
            ..Sources::new(".")
        };
        assert!(sources.configure(&mut config).is_err());
    }

    #[test]
    fn register_without_key_column_is_an_error() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), &["AQ1-00-x-y-1102.pdf"]);
        fs::write(tmp.path().join("revisions.csv"), "id;rev\n1102;A\n").unwrap();

        let sources = Sources::new(tmp.path());
        let error = sources.register(&Config::default()).unwrap_err();
        assert!(format!("{error:#}").contains("'drawing_id'"));
    }

    #[test]
    fn sync_then_generate() {
        let tmp = TempDir::new().unwrap();
        let docs = tmp.path().join("docs");
        fs::create_dir(&docs).unwrap();
        touch(
            &docs,
            &["AQ1-00-x-y-1102.pdf", "AQ1-02-x-y-D010_order.pdf", "notes.txt"],
        );
        let output = tmp.path().join("output");

        Command::Sync(Sync::new(Sources::new(&docs)))
            .run(Config::default())
            .unwrap();
        let register = fs::read_to_string(docs.join("revisions.csv")).unwrap();
        assert_eq!(
            register,
            "drawing_id;rev;issue_date;status;exists\nAQ1-00-x-y-1102;;;;yes\nAQ1-02-x-y-D010;;;;yes\n"
        );

        Command::Generate(Generate::new(Sources::new(&docs), &output))
            .run(Config::default())
            .unwrap();
        assert!(output.join("document_list_for_client.tex").exists());
        assert!(output.join("document_list_for_manufacture.tex").exists());
        assert!(output.join("document_list_for_installation.tex").exists());
        assert!(!output.join("document_list_all.tex").exists());
    }
}
