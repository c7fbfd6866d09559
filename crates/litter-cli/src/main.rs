//! litterview
//!
//! Geocodes litter index blocks and downloads Street View imagery for them.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use litter_cli::{commands, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose { "debug" } else { "info,litter=debug" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    commands::run(cli).await?;
    Ok(())
}
