//! Binary crate for the `countries` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive browsing and configuration
//! - Human-friendly output formatting

use clap::Parser;

mod browse;
mod cli;
mod logging;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logging::init(cmd.verbose);
    cmd.run().await
}
