//! Entry point for corral, a terminal AI agent with sandboxed file tools.
//!
//! This binary loads environment variables, sets up diagnostics, parses CLI
//! arguments via [`cli`], and runs the agent loop once.

mod agent;
mod cli;
mod config;
mod constants;
mod error;
mod message;
mod output;
mod provider;
mod sandbox;
mod tools;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Runs the corral CLI.
///
/// Loads `.env` files (silently ignored if absent), installs a stderr
/// `tracing` subscriber filtered by `RUST_LOG` (default `warn`), parses
/// command-line arguments into a [`cli::Cli`] struct, and runs it via
/// [`cli::run`].
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::parse();
    cli::run(cli).await
}
