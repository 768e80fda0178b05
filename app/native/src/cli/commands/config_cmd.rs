//! Config CLI commands.
//!
//! Commands for locating and inspecting the Roomdeck configuration file.

use clap::Subcommand;

use crate::cli::output;
use crate::config::{self, config_paths};
use crate::error::RoomdeckError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Show the path to the configuration file.
    ///
    /// Displays the paths where Roomdeck looks for configuration files,
    /// and indicates which one is currently in use (if any).
    Path,

    /// Show the effective configuration.
    ///
    /// Prints the loaded configuration (defaults filled in) as JSON,
    /// including the resolved storage locations.
    #[command(after_long_help = r"Examples:
  roomdeck config show
  roomdeck --config ./dev.jsonc config show")]
    Show,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands) -> Result<(), RoomdeckError> {
    match cmd {
        ConfigCommands::Path => {
            show_config_path();
            Ok(())
        }
        ConfigCommands::Show => show_config(),
    }
}

/// Show the configuration search paths.
fn show_config_path() {
    println!("Configuration file search paths (in priority order):\n");

    let mut found_config = false;
    for (i, path) in config_paths().iter().enumerate() {
        let exists = path.exists();
        let marker = if exists && !found_config {
            found_config = true;
            " (active)"
        } else if exists {
            " (exists)"
        } else {
            ""
        };

        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    if !found_config {
        println!("\nNo configuration file found, defaults are in use.");
    }
}

/// Print the effective configuration.
fn show_config() -> Result<(), RoomdeckError> {
    let config = config::get_config();
    let mut value = serde_json::to_value(config)?;

    if let Some(object) = value.as_object_mut() {
        object.insert(
            "source".to_string(),
            config::get_config_path().map_or(serde_json::Value::Null, |path| {
                serde_json::Value::String(path.display().to_string())
            }),
        );
        object.insert(
            "resolvedStorage".to_string(),
            serde_json::json!({
                "layoutsDir": config.storage.layouts_dir().display().to_string(),
                "registry": config.storage.registry().display().to_string(),
            }),
        );
    }

    output::print_highlighted_json(&value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths_returns_non_empty() {
        let paths = config_paths();
        // Should have at least one path (unless no HOME directory)
        assert!(!paths.is_empty() || std::env::var("HOME").is_err());
    }
}
