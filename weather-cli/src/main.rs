//! Binary crate for the `weather` terminal client.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and logging setup
//! - Interactive prompts and the lookup loop
//! - Human-friendly panel rendering

use clap::Parser;

mod cli;
mod console;
mod logging;
mod render;
mod session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
