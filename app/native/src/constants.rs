//! Application-wide constants.

/// Application name, used for config and data directories.
pub const APP_NAME: &str = "roomdeck";

/// Maximum number of widgets pinned to the top strip of a room.
pub const MAX_PINNED_WIDGETS: usize = 3;

/// Total width, in percent, shared by the widgets of the top strip.
pub const TOTAL_WIDTH_PERCENT: f64 = 100.0;
