//! `dreg`: generate drawing registers from a folder of drawings.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
