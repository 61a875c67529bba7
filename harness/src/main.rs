//! cnb-harness - build and run buildpack test apps

#![cfg_attr(test, allow(clippy::expect_used))]

use clap::Parser;

mod cli;
mod commands;

use cli::Cli;

#[tokio::main]
async fn main() {
    cnb_harness::infra::logging::init();
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
