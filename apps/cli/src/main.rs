//! patterndocs CLI — bug-pattern description generator.
//!
//! Downloads the bug-pattern metadata feed and writes one GitHub-flavored
//! Markdown description file per pattern.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
