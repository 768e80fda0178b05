//! CLI module for Roomdeck.
//!
//! This module provides command-line interface functionality for inspecting
//! and editing room layouts stored on disk. Each invocation loads the widget
//! registry, runs the layout engine for the requested room and flushes any
//! persisted writes before exiting.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;
use tracing_subscriber::EnvFilter;

use crate::error::RoomdeckError;

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "roomdeck=info,roomdeck_lib=info";

/// Filter used with `--verbose` when `RUST_LOG` is not set.
const VERBOSE_FILTER: &str = "roomdeck=debug,roomdeck_lib=debug";

/// Runs the CLI.
///
/// Parses command-line arguments, installs the log subscriber and executes
/// the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), RoomdeckError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.execute()
}

/// Installs a stderr `fmt` subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
