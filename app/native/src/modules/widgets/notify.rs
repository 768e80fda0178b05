//! Per-room change notifications.
//!
//! Each room owns an observable revision counter. Emitting an update for a
//! room bumps its counter, which wakes every `Subscriber` of that room.
//! Consumers treat a wake-up as the `update_<roomId>` event and re-read the
//! store accessors; the counter value itself carries no layout data.

use std::collections::HashMap;

use eyeball::{Observable, Subscriber};

use super::state::RoomId;
use crate::events;

/// Publish/subscribe hub keyed by room.
#[derive(Default)]
pub struct NotificationBus {
    rooms: HashMap<RoomId, Observable<u64>>,
}

impl NotificationBus {
    /// Create a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn channel(&mut self, room: &RoomId) -> &mut Observable<u64> {
        self.rooms.entry(room.clone()).or_insert_with(|| Observable::new(0))
    }

    /// Fire the update event of a room.
    pub fn emit(&mut self, room: &RoomId) {
        let channel = self.channel(room);
        Observable::update(channel, |revision| *revision += 1);
        tracing::trace!(
            event = %events::layout::update_event(room),
            revision = *Observable::get(channel),
            "layout update emitted"
        );
    }

    /// Subscribe to the update events of a room.
    pub fn subscribe(&mut self, room: &RoomId) -> Subscriber<u64> {
        Observable::subscribe(self.channel(room))
    }

    /// Number of update events fired for a room so far.
    #[must_use]
    pub fn revision(&self, room: &RoomId) -> u64 {
        self.rooms.get(room).map_or(0, |channel| *Observable::get(channel))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_counts_emits() {
        let mut bus = NotificationBus::new();
        let room = RoomId::from("!r:hs");
        assert_eq!(bus.revision(&room), 0);

        bus.emit(&room);
        bus.emit(&room);
        assert_eq!(bus.revision(&room), 2);
        assert_eq!(bus.revision(&RoomId::from("!other:hs")), 0);
    }

    #[test]
    fn test_subscriber_wakes_on_emit() {
        let mut bus = NotificationBus::new();
        let room = RoomId::from("!r:hs");
        let mut subscriber = bus.subscribe(&room);

        bus.emit(&room);
        let revision = futures::executor::block_on(subscriber.next());
        assert_eq!(revision, Some(1));
    }

    #[test]
    fn test_subscribers_are_isolated_per_room() {
        let mut bus = NotificationBus::new();
        let a = RoomId::from("!a:hs");
        let b = RoomId::from("!b:hs");
        let subscriber_b = bus.subscribe(&b);

        bus.emit(&a);
        assert_eq!(subscriber_b.get(), 0);
    }
}
