//! Trackbridge - transition track suggestions over a music catalog.
//!
//! Given two tracks, suggests up to eight catalog tracks that bridge them,
//! and keeps per-track playback settings. Runs as an HTTP API by default;
//! the same operations are available as CLI commands.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod server;
pub mod settings;
#[cfg(test)]
pub mod test_utils;
pub mod transition;

use clap::Parser;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy()
        .add_directive("trackbridge=info".parse()?);
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();

    cli::run_command(&args)
}
