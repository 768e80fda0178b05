//! CLI command definitions using Clap.
//!
//! This module defines all CLI commands and their arguments, organized into
//! domain-specific submodules:
//!
//! - `config_cmd` - Configuration file commands
//! - `layout` - Room layout inspection and editing
//! - `types` - Shared types used across commands

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::constants::APP_NAME;
use crate::error::RoomdeckError;
use crate::{config, schema};

pub mod config_cmd;
pub mod layout;
pub mod types;

pub use config_cmd::ConfigCommands;
pub use layout::LayoutArgs;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Roomdeck CLI - inspect and edit per-room widget layouts.
#[derive(Parser, Debug)]
#[command(name = "roomdeck")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Enable debug logging (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Room layout commands.
    ///
    /// Show and edit how the widgets of a room are split between the pinned
    /// strip, the maximized slot and the sidebar.
    Layout(LayoutArgs),

    /// Configuration file commands.
    ///
    /// Show where Roomdeck looks for its configuration and what it loaded.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output Roomdeck configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// Roomdeck configuration file. Can be redirected to a file for use with
    /// editors that support JSON Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    /// Can be used with eval or redirected to a file.
    ///
    /// Usage:
    ///   eval "$(roomdeck completions --shell zsh)"
    ///   roomdeck completions --shell fish > ~/.config/fish/completions/roomdeck.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_ref().map(PathBuf::from) }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), RoomdeckError> {
        if let Some(path) = self.config_path() {
            if !path.exists() {
                return Err(RoomdeckError::InvalidArguments(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            config::set_custom_config_path(path);
        }

        match &self.command {
            Commands::Layout(args) => layout::execute(args),
            Commands::Config(cmd) => config_cmd::execute(cmd),
            Commands::Schema => {
                println!("{}", schema::print_schema());
                Ok(())
            }
            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        generate(generator, &mut Self::command(), APP_NAME, &mut io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() { Cli::command().debug_assert(); }

    #[test]
    fn test_parse_layout_move() {
        let cli = Cli::try_parse_from([
            "roomdeck", "layout", "move", "!room:hs", "w1", "top",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Layout(_)));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "roomdeck", "schema", "--verbose", "--config", "/tmp/roomdeck.jsonc",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config_path(), Some(PathBuf::from("/tmp/roomdeck.jsonc")));
    }

    #[test]
    fn test_missing_config_file_is_rejected() {
        let cli = Cli::try_parse_from([
            "roomdeck", "--config", "/definitely/not/here.jsonc", "schema",
        ])
        .unwrap();
        assert!(matches!(cli.execute(), Err(RoomdeckError::InvalidArguments(_))));
    }

    #[test]
    fn test_unknown_container_is_rejected() {
        let result =
            Cli::try_parse_from(["roomdeck", "layout", "move", "!room:hs", "w1", "floating"]);
        assert!(result.is_err());
    }
}
