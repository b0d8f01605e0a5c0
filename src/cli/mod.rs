//! Command-line interface for trackbridge.
//!
//! Runs the HTTP API by default, and exposes the same catalog and settings
//! operations as one-shot commands.

mod commands;

pub use commands::{Cli, Commands, run_command};
