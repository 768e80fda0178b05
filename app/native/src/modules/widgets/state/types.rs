//! Core state types for the widget layout engine.
//!
//! These types form a small relational structure:
//! - `RoomId` identifies a chat room (opaque string from the homeserver)
//! - `Widget` is an application instance attached to exactly one room
//! - `Container` is one of the fixed placement slots of a room view
//!
//! Relations:
//! - `Widget.room_id` → `RoomId`
//! - `RoomLayout` assigns every `Widget.id` of a room to one `Container`

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_PINNED_WIDGETS;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of a chat room.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Create a new room identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self { Self::new(id) }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self { Self(id) }
}

/// Identifier of a widget, unique within its room.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    /// Create a new widget identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for WidgetId {
    fn from(id: &str) -> Self { Self::new(id) }
}

impl From<String> for WidgetId {
    fn from(id: String) -> Self { Self(id) }
}

// ============================================================================
// Widget Type
// ============================================================================

/// An application widget attached to a room.
///
/// The layout engine never looks inside `data`; widgets are compared by id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Widget {
    /// Widget identifier (unique per room).
    pub id: WidgetId,

    /// Room the widget is attached to.
    #[serde(default)]
    pub room_id: RoomId,

    /// Widget type as advertised by the widget itself (e.g. `m.custom`).
    #[serde(default)]
    pub kind: String,

    /// Human readable name.
    #[serde(default)]
    pub name: String,

    /// Opaque application payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Widget {
    /// Create a widget with an empty payload.
    #[must_use]
    pub fn new(id: impl Into<WidgetId>, room_id: impl Into<RoomId>) -> Self {
        Self {
            id: id.into(),
            room_id: room_id.into(),
            kind: String::new(),
            name: String::new(),
            data: serde_json::Value::Null,
        }
    }
}

impl PartialEq for Widget {
    fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl Eq for Widget {}

// ============================================================================
// Container Type
// ============================================================================

/// Placement slot of a room view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    /// Pinned strip above the timeline. Ordered, at most three widgets.
    Top,

    /// Maximized spotlight. Holds at most one widget.
    Center,

    /// Default sidebar bucket. Unlimited and unordered.
    #[default]
    Right,
}

impl Container {
    /// All containers, in display order.
    pub const ALL: [Self; 3] = [Self::Top, Self::Center, Self::Right];

    /// Returns the container name as a static lowercase string.
    ///
    /// This matches the serialized form used in the persisted layout.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    /// Maximum number of widgets the container accepts, `None` when unlimited.
    #[must_use]
    pub const fn capacity(self) -> Option<usize> {
        match self {
            Self::Top => Some(MAX_PINNED_WIDGETS),
            Self::Center => Some(1),
            Self::Right => None,
        }
    }

    /// Returns true if member order is user-meaningful and persisted.
    #[must_use]
    pub const fn is_ordered(self) -> bool { matches!(self, Self::Top | Self::Center) }

    /// Returns true if the container carries a shared height and per-widget widths.
    #[must_use]
    pub const fn is_resizable(self) -> bool { matches!(self, Self::Top) }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

// ============================================================================
// Placement Type
// ============================================================================

/// Where a single widget currently sits within its room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Container holding the widget.
    pub container: Container,

    /// 0-based ordinal within the container.
    pub index: usize,

    /// Explicit proportional width, `Top` only.
    pub width: Option<u32>,

    /// Shared row height, `Top` only.
    pub height: Option<u32>,
}

// ============================================================================
// Session Status
// ============================================================================

/// Viability of the client session the layouts belong to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    /// Session is usable; layouts are kept.
    #[default]
    Viable,

    /// Session ended (logout, lost connectivity); layouts must be cleared.
    NotViable,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_capacity() {
        assert_eq!(Container::Top.capacity(), Some(3));
        assert_eq!(Container::Center.capacity(), Some(1));
        assert_eq!(Container::Right.capacity(), None);
    }

    #[test]
    fn test_container_serializes_lowercase() {
        let json = serde_json::to_string(&Container::Center).unwrap();
        assert_eq!(json, "\"center\"");

        let parsed: Container = serde_json::from_str("\"top\"").unwrap();
        assert_eq!(parsed, Container::Top);
    }

    #[test]
    fn test_container_default_is_right() {
        assert_eq!(Container::default(), Container::Right);
    }

    #[test]
    fn test_widget_identity_is_by_id() {
        let mut a = Widget::new("w1", "!room:example.org");
        a.name = "Etherpad".to_string();
        let b = Widget::new("w1", "!room:example.org");
        assert_eq!(a, b);
        assert_ne!(a, Widget::new("w2", "!room:example.org"));
    }

    #[test]
    fn test_widget_deserializes_with_missing_fields() {
        let widget: Widget = serde_json::from_str(r#"{ "id": "jitsi" }"#).unwrap();
        assert_eq!(widget.id.as_str(), "jitsi");
        assert!(widget.kind.is_empty());
        assert!(widget.data.is_null());
    }

    #[test]
    fn test_ids_display() {
        assert_eq!(RoomId::from("!abc:hs").to_string(), "!abc:hs");
        assert_eq!(WidgetId::from("w").to_string(), "w");
    }
}
