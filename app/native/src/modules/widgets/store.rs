//! The widget layout store.
//!
//! `LayoutStore` owns the in-memory layout of every room and is the single
//! writer of that state. It is a plain struct: callers hold it by `&mut`,
//! usually from the layout actor's task, so recalculation and user
//! mutations never interleave.
//!
//! # Data Flow
//!
//! ```text
//! registry change ──▶ recalculate_room ──┐
//! shared state change ─▶ (invalidate echo) ┤──▶ rooms[room] ──▶ update_<room>
//! user mutation ──▶ move/resize/... ─────┘        │
//!                                                 └──▶ PersistenceBridge (write-through)
//! ```
//!
//! Layouts are computed lazily: the first query for a room computes it from
//! the registry and the persisted layout without firing a notification.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use eyeball::Subscriber;

use super::layout::{compute_room_layout, cumulative_distributions, widths_from_distributions};
use super::notify::NotificationBus;
use super::persistence::{PersistedLayout, PersistenceBridge};
use super::registry::WidgetRegistry;
use super::state::{Container, Placement, RoomId, RoomLayout, WidgetId};
use crate::error::LayoutError;

/// Owner of every room layout.
pub struct LayoutStore {
    registry: Arc<dyn WidgetRegistry>,
    persistence: PersistenceBridge,
    rooms: HashMap<RoomId, RoomLayout>,
    bus: NotificationBus,
    started: bool,
}

impl LayoutStore {
    /// Create a store over a registry and a persistence bridge.
    #[must_use]
    pub fn new(registry: Arc<dyn WidgetRegistry>, persistence: PersistenceBridge) -> Self {
        Self {
            registry,
            persistence,
            rooms: HashMap::new(),
            bus: NotificationBus::new(),
            started: false,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Compute the layout of every visible room.
    ///
    /// Returns `false` if the store was already started.
    pub fn start(&mut self) -> bool {
        if self.started {
            tracing::debug!("layout store already started");
            return false;
        }
        self.started = true;

        let rooms = self.registry.visible_rooms();
        tracing::debug!(rooms = rooms.len(), "computing initial room layouts");
        for room in &rooms {
            self.recalculate_room(room);
        }
        true
    }

    /// Check if `start` has run.
    #[must_use]
    pub const fn is_started(&self) -> bool { self.started }

    /// Clear every known room layout because the session can no longer be used.
    ///
    /// Cleared rooms stay cached as empty layouts until they are recalculated.
    /// Rooms that had widgets placed are notified once.
    pub fn on_session_not_viable(&mut self) {
        tracing::info!("session is no longer viable, clearing widget layouts");
        self.persistence.invalidate_all();

        let mut populated = Vec::new();
        for (room, layout) in &mut self.rooms {
            if !layout.is_empty() {
                populated.push(room.clone());
            }
            *layout = RoomLayout::new();
        }

        for room in &populated {
            self.bus.emit(room);
        }
    }

    // ========================================================================
    // Recalculation
    // ========================================================================

    fn compute(
        registry: &dyn WidgetRegistry,
        persistence: &PersistenceBridge,
        room: &RoomId,
        previous_height: Option<u32>,
    ) -> RoomLayout {
        let widgets = registry.widgets_for_room(room);
        if widgets.is_empty() {
            return RoomLayout::new();
        }
        let persisted = persistence.read(room);
        compute_room_layout(&widgets, &persisted, previous_height)
    }

    /// Recompute the layout of a room from the registry and persisted state.
    ///
    /// A room left without widgets is notified only if it previously had some.
    pub fn recalculate_room(&mut self, room: &RoomId) {
        let previous = self.rooms.get(room);
        let was_populated = previous.is_some_and(|layout| !layout.is_empty());
        let previous_height = previous.and_then(RoomLayout::top_height);

        let layout = Self::compute(self.registry.as_ref(), &self.persistence, room, previous_height);
        let now_populated = !layout.is_empty();
        tracing::debug!(
            room = %room,
            widgets = layout.widget_count(),
            pinned = layout.widgets(Container::Top).len(),
            "recalculated room layout"
        );
        self.rooms.insert(room.clone(), layout);

        if now_populated || was_populated {
            self.bus.emit(room);
        }
    }

    /// The widgets of a room changed in the registry.
    pub fn on_widgets_changed(&mut self, room: &RoomId) { self.recalculate_room(room); }

    /// Another session wrote the persisted layout of a room.
    pub fn on_persisted_layout_changed(&mut self, room: &RoomId) {
        self.persistence.invalidate(room);
        self.recalculate_room(room);
    }

    fn room_mut(&mut self, room: &RoomId) -> &mut RoomLayout {
        match self.rooms.entry(room.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                entry.insert(Self::compute(self.registry.as_ref(), &self.persistence, room, None))
            }
        }
    }

    /// Write the layout of a room through to persistence and notify.
    fn commit(&mut self, room: &RoomId) {
        if let Some(layout) = self.rooms.get(room) {
            self.persistence.write(room, PersistedLayout::from(layout));
        }
        self.bus.emit(room);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Current layout of a room, computing it on first access.
    pub fn room_layout(&mut self, room: &RoomId) -> &RoomLayout { self.room_mut(room) }

    /// Members of a container, in ordinal order.
    pub fn get_container_widgets(&mut self, room: &RoomId, container: Container) -> Vec<WidgetId> {
        self.room_mut(room).widgets(container).to_vec()
    }

    /// Check if a widget sits in a given container.
    pub fn is_in_container(&mut self, room: &RoomId, widget: &WidgetId, container: Container) -> bool {
        self.room_mut(room).container_of(widget) == Some(container)
    }

    /// Placement of a widget, `None` if it is not in the room.
    pub fn placement(&mut self, room: &RoomId, widget: &WidgetId) -> Option<Placement> {
        self.room_mut(room).placement(widget)
    }

    /// Check if a widget is maximized in the room.
    pub fn has_maximised_widget(&mut self, room: &RoomId) -> bool {
        !self.room_mut(room).widgets(Container::Center).is_empty()
    }

    /// Check if at least one widget is pinned in the room.
    pub fn has_pinned_widgets(&mut self, room: &RoomId) -> bool {
        !self.room_mut(room).widgets(Container::Top).is_empty()
    }

    /// Check if another widget fits into a container.
    pub fn can_add_to_container(&mut self, room: &RoomId, container: Container) -> bool {
        self.room_mut(room).can_add(container)
    }

    /// Shared height of a container. `None` means never set.
    pub fn get_container_height(&mut self, room: &RoomId, container: Container) -> Option<u32> {
        if !container.is_resizable() {
            return None;
        }
        self.room_mut(room).top_height()
    }

    /// Cumulative resizer positions of a container (`"33.3%"`, `"66.7%"`).
    ///
    /// Empty unless the container is resizable and holds two widgets or more.
    pub fn get_resizer_distributions(&mut self, room: &RoomId, container: Container) -> Vec<String> {
        if !container.is_resizable() {
            return Vec::new();
        }
        cumulative_distributions(&self.room_mut(room).effective_top_widths())
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Move a widget into a container, appending it at the end.
    ///
    /// Maximizing a widget sends the current occupant of `Center` to `Right`.
    /// Unknown widgets and moves into the current container are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::CapacityExceeded`] if `Top` is full. The layout
    /// is left untouched.
    pub fn move_to_container(
        &mut self,
        room: &RoomId,
        widget: &WidgetId,
        container: Container,
    ) -> Result<(), LayoutError> {
        let layout = self.room_mut(room);
        let Some(current) = layout.container_of(widget) else {
            tracing::debug!(room = %room, widget = %widget, "ignoring move of unknown widget");
            return Ok(());
        };
        if current == container {
            return Ok(());
        }
        if container == Container::Top && !layout.can_add(Container::Top) {
            return Err(LayoutError::CapacityExceeded {
                room: room.clone(),
                container,
                capacity: container.capacity().unwrap_or_default(),
            });
        }

        layout.remove(widget);
        if let Some(evicted) = layout.append(container, widget.clone()) {
            tracing::debug!(room = %room, widget = %evicted, "maximized widget moved to the sidebar");
        }
        tracing::debug!(room = %room, widget = %widget, from = %current, to = %container, "moved widget");

        self.commit(room);
        Ok(())
    }

    /// Move a widget to `target` within its container.
    ///
    /// The target is clamped to the container. Returns `true` if the order
    /// changed; nothing is persisted or notified otherwise.
    pub fn move_within_container(
        &mut self,
        room: &RoomId,
        container: Container,
        widget: &WidgetId,
        target: usize,
    ) -> bool {
        if !self.room_mut(room).reorder(container, widget, target) {
            return false;
        }
        tracing::debug!(room = %room, widget = %widget, container = %container, target, "reordered widget");
        self.commit(room);
        true
    }

    /// Set the shared height of a container. `None` resets it.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::HeightNotSupported`] for containers other than `Top`.
    pub fn set_container_height(
        &mut self,
        room: &RoomId,
        container: Container,
        height: Option<u32>,
    ) -> Result<(), LayoutError> {
        if !container.is_resizable() {
            return Err(LayoutError::HeightNotSupported(container));
        }
        self.room_mut(room).set_top_height(height);
        self.commit(room);
        Ok(())
    }

    /// Apply resizer positions produced by a drag of the container's dividers.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidDistribution`] if the container is not
    /// resizable or the positions do not describe its members.
    pub fn set_resizer_distributions(
        &mut self,
        room: &RoomId,
        container: Container,
        distributions: &[String],
    ) -> Result<(), LayoutError> {
        if !container.is_resizable() {
            return Err(LayoutError::InvalidDistribution(format!(
                "container '{container}' has no resizers"
            )));
        }
        let layout = self.room_mut(room);
        let widths = widths_from_distributions(distributions, layout.widgets(container).len())?;
        layout.set_top_widths(&widths);
        self.commit(room);
        Ok(())
    }

    /// Write the complete current layout of a room to shared state.
    ///
    /// Pinned widgets are written with their effective widths so other
    /// viewers see the same proportions.
    pub fn copy_layout_to_room(&mut self, room: &RoomId) {
        let snapshot = PersistedLayout::snapshot(self.room_mut(room));
        tracing::debug!(room = %room, widgets = snapshot.len(), "copying layout to room");
        self.persistence.write(room, snapshot);
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Subscribe to `update_<room>` events.
    pub fn subscribe(&mut self, room: &RoomId) -> Subscriber<u64> { self.bus.subscribe(room) }

    /// Number of `update_<room>` events fired so far.
    #[must_use]
    pub fn revision(&self, room: &RoomId) -> u64 { self.bus.revision(room) }
}

// ============================================================================
// Tests
// ============================================================================
