//! Command-line interface
//!
//! There is no subcommand: a plain invocation imports the task file, and
//! `--setup` fetches board metadata to seed the configuration instead.

pub mod import;
mod output;
pub mod setup;

use std::path::Path;

use anyhow::Result;
use clap::Parser;

use crate::board::BoardClient;
use crate::storage::Config;

pub use output::Output;

/// Fixed input and output locations
pub const CONFIG_PATH: &str = "inputs/config.json";
pub const TASKS_PATH: &str = "inputs/tasks.csv";
pub const OUTPUT_DIR: &str = "outputs";

#[derive(Parser)]
#[command(name = "planport")]
#[command(author, version, about = "Import a project plan into a Trello board")]
pub struct Cli {
    /// Fetch board members, labels and lists to seed the configuration
    #[arg(long)]
    pub setup: bool,
}

/// Main entry point for the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new();

    let config = Config::load(Path::new(CONFIG_PATH))?;
    let client = BoardClient::new(&config.api.key, &config.api.token);

    if cli.setup {
        setup::run(&client, &config, Path::new(OUTPUT_DIR), &output).await
    } else {
        import::run(&client, &config, Path::new(TASKS_PATH), &output).await
    }
}
