use anyhow::Context;
use clap::Parser;
use drawreg::{Config, storage::sync};
use tracing::instrument;

use super::{Sources, terminal::Colorize};

#[derive(Debug, Clone, Parser)]
#[command(about = "Bring the revision register in line with the documents folder")]
pub struct Sync {
    #[command(flatten)]
    sources: Sources,
}

impl Sync {
    #[cfg(test)]
    pub const fn new(sources: Sources) -> Self {
        Self { sources }
    }

    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, mut config: Config) -> anyhow::Result<()> {
        self.sources.configure(&mut config)?;

        let documents = self.sources.documents(&config);
        let path = self.sources.revisions();
        let summary = sync(&path, config.delimiter(), &documents)
            .with_context(|| format!("Failed to sync register {}", path.display()))?;

        println!("{} {}", "Synced".success(), path.display());
        println!("  added:   {}", summary.added);
        println!("  present: {}", summary.present);
        if summary.missing > 0 {
            println!(
                "  missing: {}",
                summary.missing.to_string().warning()
            );
        } else {
            println!("  missing: 0");
        }

        Ok(())
    }
}
