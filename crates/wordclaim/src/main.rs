//! Wordclaim - console host
//!
//! Spoken word-claiming board game for two players.

#![warn(missing_docs)]

mod cli;
mod console;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,wordclaim=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            words,
            config,
            speech,
        } => {
            info!("Starting wordclaim console");
            console::play(&words, &config, speech).await
        }
        Command::Check { words } => console::check(&words),
    }
}
