//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};
use cnb_harness::Harness;

use crate::commands;

/// Build and run Cloud Native Buildpack test apps
#[derive(Parser)]
#[command(
    name = "cnb-harness",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Download and extract the latest release of a buildpack
    Fetch(commands::fetch::FetchArgs),

    /// Build an app directory into an image with pack
    Build(commands::build::BuildArgs),

    /// Register the configured stack with pack if missing
    Stack,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli { json, command } = self;
        let harness = Harness::from_env()?;
        match command {
            Command::Fetch(args) => commands::fetch::run(&harness, &args, json).await,
            Command::Build(args) => commands::build::run(&harness, &args, json).await,
            Command::Stack => commands::stack::run(&harness).await,
        }
    }
}
