//! Widget registry adapter.
//!
//! The registry knows which widgets are attached to which room. The layout
//! engine only consumes it; change notifications are delivered to the store
//! (`LayoutStore::on_widgets_changed`) or to the actor
//! (`LayoutMessage::WidgetsChanged`) by whoever owns the registry.

use std::collections::BTreeMap;
use std::path::Path;

use parking_lot::RwLock;

use super::state::{RoomId, Widget};

/// Source of the widgets attached to rooms.
pub trait WidgetRegistry: Send + Sync {
    /// Widgets attached to a room, in registry order.
    fn widgets_for_room(&self, room: &RoomId) -> Vec<Widget>;

    /// Rooms visible to the current session.
    fn visible_rooms(&self) -> Vec<RoomId>;
}

/// In-memory registry.
///
/// Rooms are kept in id order so `visible_rooms` is deterministic.
#[derive(Debug, Default)]
pub struct StaticRegistry {
    rooms: RwLock<BTreeMap<RoomId, Vec<Widget>>>,
}

impl StaticRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Load a registry from a JSON file shaped `{ "<room id>": [widget, ...] }`.
    ///
    /// Widgets missing a `room_id` inherit the room they are listed under.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let file = std::fs::File::open(path)?;
        let reader = json_comments::StripComments::new(file);
        let rooms: BTreeMap<RoomId, Vec<Widget>> = serde_json::from_reader(reader)?;

        let registry = Self::new();
        for (room, widgets) in rooms {
            registry.set_widgets(&room, widgets);
        }
        Ok(registry)
    }

    /// Replace the widgets of a room.
    pub fn set_widgets(&self, room: &RoomId, widgets: Vec<Widget>) {
        let widgets = widgets
            .into_iter()
            .map(|mut widget| {
                if widget.room_id.as_str().is_empty() {
                    widget.room_id = room.clone();
                }
                widget
            })
            .collect();
        self.rooms.write().insert(room.clone(), widgets);
    }

    /// Attach a widget to its room.
    pub fn add_widget(&self, widget: Widget) {
        self.rooms.write().entry(widget.room_id.clone()).or_default().push(widget);
    }

    /// Detach every widget from a room, keeping the room visible.
    pub fn clear_room(&self, room: &RoomId) {
        if let Some(widgets) = self.rooms.write().get_mut(room) {
            widgets.clear();
        }
    }
}

impl WidgetRegistry for StaticRegistry {
    fn widgets_for_room(&self, room: &RoomId) -> Vec<Widget> {
        self.rooms.read().get(room).cloned().unwrap_or_default()
    }

    fn visible_rooms(&self) -> Vec<RoomId> { self.rooms.read().keys().cloned().collect() }
}

// ============================================================================
// Tests
// ============================================================================
