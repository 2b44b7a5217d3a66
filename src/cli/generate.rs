use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use drawreg::{
    Config,
    domain::Assembler,
    storage::{Written, write_reports},
};
use tracing::instrument;

use super::{Sources, terminal::Colorize};

#[derive(Debug, Clone, Parser)]
#[command(about = "Render one document list per package")]
pub struct Generate {
    #[command(flatten)]
    sources: Sources,

    /// Folder for the generated document_list_*.tex files
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Also render a list of every document, including unclassified ones
    #[arg(long)]
    all: bool,
}

impl Default for Generate {
    fn default() -> Self {
        Self::new(Sources::default(), "output")
    }
}

impl Generate {
    pub fn new(sources: Sources, output_dir: impl AsRef<Path>) -> Self {
        Self {
            sources,
            output_dir: output_dir.as_ref().to_path_buf(),
            all: false,
        }
    }

    pub fn documents_dir(&self) -> &Path {
        self.sources.documents_dir()
    }

    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, mut config: Config) -> anyhow::Result<()> {
        self.render(&mut config).map(|_| ())
    }

    /// Writes the lists and reports them, returning what was written.
    pub fn render(&self, config: &mut Config) -> anyhow::Result<Vec<Written>> {
        self.sources.configure(config)?;
        if self.all {
            config.catch_all = true;
        }

        let documents = self.sources.documents(config);
        let register = self.sources.register(config)?;

        let written = write_reports(
            &documents,
            &register,
            &Assembler::default(),
            config,
            &self.output_dir,
        )
        .with_context(|| {
            format!(
                "Failed to write document lists to {}",
                self.output_dir.display()
            )
        })?;

        if written.is_empty() {
            println!(
                "{}",
                format!(
                    "No listed documents in {}",
                    self.sources.documents_dir().display()
                )
                .warning()
            );
        }
        for file in &written {
            println!(
                "{} {} {}",
                "Wrote".success(),
                file.path.display(),
                format!("({} documents)", file.documents).dim()
            );
        }

        Ok(written)
    }
}
