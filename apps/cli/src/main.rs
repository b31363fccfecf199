//! topicgen CLI — generate essay topics for a domain and file them as a GitHub issue.
//!
//! Designed to run once per scheduled CI trigger. All run parameters come
//! from the environment; see `topicgen --help` for the optional flags.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
