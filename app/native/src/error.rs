//! Error types for Roomdeck.
//!
//! `LayoutError` is returned by the layout mutation API. `RoomdeckError`
//! gathers every failure the command-line surface can report.

use thiserror::Error;

use crate::config::ConfigError;
use crate::modules::widgets::{ActorError, Container, PersistenceError, RoomId};

/// Errors returned by layout mutations.
///
/// A rejected mutation leaves the room layout untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The destination container is full.
    #[error("Container '{container}' of room {room} is full (capacity {capacity})")]
    CapacityExceeded {
        /// Room whose container is full.
        room: RoomId,
        /// Container that rejected the widget.
        container: Container,
        /// Maximum number of widgets the container holds.
        capacity: usize,
    },

    /// Only the top container has a configurable height.
    #[error("Container '{0}' does not support a height")]
    HeightNotSupported(Container),

    /// Resizer distributions could not be applied.
    #[error("Invalid resizer distributions: {0}")]
    InvalidDistribution(String),
}

/// Errors that can occur while running Roomdeck commands.
#[derive(Debug, Error)]
pub enum RoomdeckError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),

    /// A layout mutation was rejected.
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Persistence backend failure.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Layout actor communication failed.
    #[error("Actor error: {0}")]
    Actor(#[from] ActorError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<String> for RoomdeckError {
    fn from(msg: String) -> Self { Self::InvalidArguments(msg) }
}

impl From<&str> for RoomdeckError {
    fn from(msg: &str) -> Self { Self::InvalidArguments(msg.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_exceeded_display() {
        let err = LayoutError::CapacityExceeded {
            room: RoomId::from("!r:hs"),
            container: Container::Top,
            capacity: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("'top'"));
        assert!(msg.contains("!r:hs"));
        assert!(msg.contains("capacity 3"));
    }

    #[test]
    fn test_height_not_supported_display() {
        let err = LayoutError::HeightNotSupported(Container::Right);
        assert!(err.to_string().contains("'right'"));
    }

    #[test]
    fn test_layout_error_converts() {
        let err: RoomdeckError = LayoutError::InvalidDistribution("bad".to_string()).into();
        let msg = err.to_string();
        assert!(msg.contains("Layout error"));
        assert!(msg.contains("bad"));
    }

    #[test]
    fn test_io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RoomdeckError = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_persistence_error_converts() {
        let err: RoomdeckError = PersistenceError::Backend("offline".to_string()).into();
        assert!(err.to_string().contains("offline"));
    }

    #[test]
    fn test_from_str() {
        let err: RoomdeckError = "missing room".into();
        assert!(matches!(err, RoomdeckError::InvalidArguments(_)));
        assert_eq!(err.to_string(), "missing room");
    }
}
