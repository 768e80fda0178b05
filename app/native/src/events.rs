//! Centralized event names.
//!
//! Observers of the layout engine listen to named events. All names are
//! defined here so the engine and its consumers stay in sync.
//!
//! ## Naming Convention
//!
//! Per-room layout events follow the pattern `update_<roomId>`, with no
//! payload. Consumers re-read the store accessors when the event fires.

use crate::modules::widgets::RoomId;

/// Widget layout events.
pub mod layout {
    use super::RoomId;

    /// Prefix of the per-room layout update event.
    ///
    /// Payload: `()` (no payload)
    pub const UPDATE_PREFIX: &str = "update_";

    /// Name of the update event for a room, e.g. `update_!abc:example.org`.
    #[must_use]
    pub fn update_event(room: &RoomId) -> String { format!("{UPDATE_PREFIX}{room}") }

    /// Room targeted by an update event name, if the name is one.
    #[must_use]
    pub fn room_from_event(event: &str) -> Option<RoomId> {
        event
            .strip_prefix(UPDATE_PREFIX)
            .filter(|room| !room.is_empty())
            .map(RoomId::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_event_name() {
        let room = RoomId::from("!abc:example.org");
        assert_eq!(layout::update_event(&room), "update_!abc:example.org");
    }

    #[test]
    fn test_room_from_event_round_trips() {
        let room = RoomId::from("!abc:example.org");
        let event = layout::update_event(&room);
        assert_eq!(layout::room_from_event(&event), Some(room));
    }

    #[test]
    fn test_room_from_event_rejects_other_names() {
        assert_eq!(layout::room_from_event("roomdeck://presence/changed"), None);
        assert_eq!(layout::room_from_event("update_"), None);
    }
}
