//! Configuration types for Roomdeck.
//!
//! This module provides the configuration types and loading functionality.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::APP_NAME;

/// Default active window in milliseconds.
const DEFAULT_ACTIVE_THRESHOLD_MS: u64 = 10_000;

/// Default passive window in milliseconds.
const DEFAULT_PASSIVE_THRESHOLD_MS: u64 = 2 * 60 * 1000;

/// Presence tracking configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PresenceConfig {
    /// How long after the last interaction the user counts as active, in milliseconds.
    /// Default: 10000
    pub active_threshold_ms: u64,

    /// How long after the last interaction the user counts as passive, in milliseconds.
    /// Default: 120000
    pub passive_threshold_ms: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            active_threshold_ms: DEFAULT_ACTIVE_THRESHOLD_MS,
            passive_threshold_ms: DEFAULT_PASSIVE_THRESHOLD_MS,
        }
    }
}

impl PresenceConfig {
    /// Active window as a duration.
    #[must_use]
    pub const fn active_window(&self) -> Duration { Duration::from_millis(self.active_threshold_ms) }

    /// Passive window as a duration.
    #[must_use]
    pub const fn passive_window(&self) -> Duration { Duration::from_millis(self.passive_threshold_ms) }
}

/// Storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageConfig {
    /// Directory holding one persisted layout file per room.
    /// Default: `<data dir>/roomdeck/layouts`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layouts_dir: Option<PathBuf>,

    /// Widget registry file (`{ "<room id>": [widget, ...] }`).
    /// Default: `<data dir>/roomdeck/widgets.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<PathBuf>,
}

impl StorageConfig {
    /// Directory for persisted layouts, falling back to the default location.
    #[must_use]
    pub fn layouts_dir(&self) -> PathBuf {
        self.layouts_dir.clone().unwrap_or_else(|| data_dir().join("layouts"))
    }

    /// Widget registry file, falling back to the default location.
    #[must_use]
    pub fn registry(&self) -> PathBuf {
        self.registry.clone().unwrap_or_else(|| data_dir().join("widgets.json"))
    }
}

/// Application data directory.
fn data_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_NAME)
}

/// Root configuration structure for Roomdeck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RoomdeckConfig {
    /// User presence tracking.
    pub presence: PresenceConfig,

    /// Where layouts and the widget registry are stored.
    pub storage: StorageConfig,
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at $XDG_CONFIG_HOME/roomdeck/config.jsonc or \
         ~/.config/roomdeck/config.jsonc"
    )]
    NotFound,

    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations (both `.jsonc` and `.json` variants):
/// 1. `$XDG_CONFIG_HOME/roomdeck/`
/// 2. `~/.config/roomdeck/`
/// 3. The platform configuration directory (`dirs::config_dir()/roomdeck/`)
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut dirs_to_search = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        dirs_to_search.push(PathBuf::from(xdg_config).join(APP_NAME));
    }
    if let Some(home) = dirs::home_dir() {
        dirs_to_search.push(home.join(".config").join(APP_NAME));
    }
    if let Some(config_dir) = dirs::config_dir() {
        dirs_to_search.push(config_dir.join(APP_NAME));
    }

    let mut paths = Vec::new();
    for dir in dirs_to_search {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            // XDG_CONFIG_HOME is often ~/.config
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }
    paths
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config_from_path(path: &Path) -> Result<(RoomdeckConfig, PathBuf), ConfigError> {
    let file = fs::File::open(path)?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    let config: RoomdeckConfig = serde_json::from_reader(reader)?;
    Ok((config, path.to_path_buf()))
}

/// Loads the configuration from the first existing default location.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if no file exists, or an error if the
/// first existing file cannot be read or parsed.
pub fn load_config() -> Result<(RoomdeckConfig, PathBuf), ConfigError> {
    config_paths()
        .into_iter()
        .find(|path| path.exists())
        .map_or(Err(ConfigError::NotFound), |path| load_config_from_path(&path))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = RoomdeckConfig::default();
        assert_eq!(config.presence.active_window(), Duration::from_secs(10));
        assert_eq!(config.presence.passive_window(), Duration::from_secs(120));
        assert!(config.storage.layouts_dir.is_none());
        assert!(config.storage.layouts_dir().ends_with("roomdeck/layouts"));
    }

    #[test]
    fn test_config_deserializes_partial_presence() {
        let json = r#"{ "presence": { "activeThresholdMs": 5000 } }"#;
        let config: RoomdeckConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.presence.active_threshold_ms, 5000);
        assert_eq!(config.presence.passive_threshold_ms, DEFAULT_PASSIVE_THRESHOLD_MS);
    }

    #[test]
    fn test_load_config_from_path_strips_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                // where layouts live
                "storage": {{ "layoutsDir": "/tmp/roomdeck-layouts" }} /* trailing */
            }}"#
        )
        .unwrap();

        let (config, path) = load_config_from_path(file.path()).unwrap();
        assert_eq!(path, file.path());
        assert_eq!(config.storage.layouts_dir(), PathBuf::from("/tmp/roomdeck-layouts"));
    }

    #[test]
    fn test_load_config_from_path_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{ not json").unwrap();

        assert!(matches!(load_config_from_path(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_from_missing_path_is_io_error() {
        let result = load_config_from_path(Path::new("/definitely/not/here.jsonc"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_paths_use_app_name() {
        for path in config_paths() {
            assert!(path.to_string_lossy().contains(APP_NAME));
        }
    }
}
