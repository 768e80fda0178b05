//! The per-room layout model.
//!
//! A `RoomLayout` stores the members of each container as ordered vectors,
//! so ordinal indices are always contiguous from zero. Placement data for a
//! single widget (`Placement`) is derived from these vectors on demand.

use std::collections::BTreeMap;

use serde::Serialize;
use smallvec::SmallVec;

use super::types::{Container, Placement, WidgetId};
use crate::constants::MAX_PINNED_WIDGETS;
use crate::modules::widgets::layout::normalized_widths;

/// Pinned widget list. Inline storage for the whole top strip.
pub type PinnedIds = SmallVec<[WidgetId; MAX_PINNED_WIDGETS]>;

/// Arrangement of the widgets of one room.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RoomLayout {
    /// Pinned widgets, left to right.
    top: PinnedIds,

    /// Maximized widget.
    center: Option<WidgetId>,

    /// Sidebar widgets.
    right: Vec<WidgetId>,

    /// Explicit widths of pinned widgets (relative units, usually percent).
    widths: BTreeMap<WidgetId, u32>,

    /// Shared height of the pinned row. `None` means never configured.
    top_height: Option<u32>,
}

impl RoomLayout {
    /// Create an empty layout.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Assemble a layout from already validated parts.
    pub(crate) fn from_parts(
        top: PinnedIds,
        center: Option<WidgetId>,
        right: Vec<WidgetId>,
        widths: BTreeMap<WidgetId, u32>,
        top_height: Option<u32>,
    ) -> Self {
        debug_assert!(top.len() <= MAX_PINNED_WIDGETS);
        let widths = widths.into_iter().filter(|(id, _)| top.contains(id)).collect();
        Self {
            top,
            center,
            right,
            widths,
            top_height,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Members of a container, in ordinal order.
    #[must_use]
    pub fn widgets(&self, container: Container) -> &[WidgetId] {
        match container {
            Container::Top => &self.top,
            Container::Center => self.center.as_slice(),
            Container::Right => &self.right,
        }
    }

    /// Number of widgets across all containers.
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.top.len() + usize::from(self.center.is_some()) + self.right.len()
    }

    /// Check if no widget is placed anywhere.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.widget_count() == 0 }

    /// Check if the layout places anything outside the default container.
    #[must_use]
    pub fn has_explicit_placements(&self) -> bool { !self.top.is_empty() || self.center.is_some() }

    /// Container currently holding a widget.
    #[must_use]
    pub fn container_of(&self, id: &WidgetId) -> Option<Container> {
        Container::ALL.into_iter().find(|&c| self.widgets(c).contains(id))
    }

    /// Check if a widget is placed anywhere in the room.
    #[must_use]
    pub fn contains(&self, id: &WidgetId) -> bool { self.container_of(id).is_some() }

    /// Derived placement of a widget.
    #[must_use]
    pub fn placement(&self, id: &WidgetId) -> Option<Placement> {
        let container = self.container_of(id)?;
        let index = self.widgets(container).iter().position(|w| w == id)?;
        let (width, height) = if container == Container::Top {
            (self.widths.get(id).copied(), self.top_height)
        } else {
            (None, None)
        };
        Some(Placement {
            container,
            index,
            width,
            height,
        })
    }

    /// Check if another widget fits into a container.
    #[must_use]
    pub fn can_add(&self, container: Container) -> bool {
        container.capacity().is_none_or(|cap| self.widgets(container).len() < cap)
    }

    /// Explicit width of a pinned widget.
    #[must_use]
    pub fn width(&self, id: &WidgetId) -> Option<u32> { self.widths.get(id).copied() }

    /// Shared height of the pinned row.
    #[must_use]
    pub const fn top_height(&self) -> Option<u32> { self.top_height }

    /// Widths of the pinned widgets in percent, normalized to sum to 100.
    #[must_use]
    pub fn effective_top_widths(&self) -> Vec<f64> {
        let explicit: Vec<Option<u32>> = self.top.iter().map(|id| self.width(id)).collect();
        normalized_widths(&explicit)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Remove a widget from whichever container holds it.
    ///
    /// Leaving the top strip drops the widget's explicit width.
    pub(crate) fn remove(&mut self, id: &WidgetId) -> Option<Container> {
        let container = self.container_of(id)?;
        match container {
            Container::Top => {
                self.top.retain(|w| w != id);
                self.widths.remove(id);
            }
            Container::Center => self.center = None,
            Container::Right => self.right.retain(|w| w != id),
        }
        Some(container)
    }

    /// Append a widget at the end of a container.
    ///
    /// The widget must not be placed anywhere yet. Placing into `Center`
    /// evicts the previous occupant to the end of `Right`; the evicted id
    /// is returned. Callers check `Top` capacity before calling.
    pub(crate) fn append(&mut self, container: Container, id: WidgetId) -> Option<WidgetId> {
        debug_assert!(!self.contains(&id));
        match container {
            Container::Top => {
                debug_assert!(self.can_add(Container::Top));
                self.top.push(id);
                None
            }
            Container::Center => {
                let evicted = self.center.replace(id);
                if let Some(ref previous) = evicted {
                    self.right.push(previous.clone());
                }
                evicted
            }
            Container::Right => {
                self.right.push(id);
                None
            }
        }
    }

    /// Move a widget to `target` within its container, clamping the target.
    ///
    /// Returns `true` if the order changed.
    pub(crate) fn reorder(&mut self, container: Container, id: &WidgetId, target: usize) -> bool {
        let members: &mut [WidgetId] = match container {
            Container::Top => &mut self.top,
            Container::Center => return false,
            Container::Right => &mut self.right,
        };
        let Some(current) = members.iter().position(|w| w == id) else {
            return false;
        };
        let target = target.min(members.len() - 1);
        if current == target {
            return false;
        }
        if current < target {
            members[current..=target].rotate_left(1);
        } else {
            members[target..=current].rotate_right(1);
        }
        true
    }

    /// Set explicit widths for the pinned widgets, in strip order.
    pub(crate) fn set_top_widths(&mut self, widths: &[u32]) {
        for (id, width) in self.top.iter().zip(widths) {
            self.widths.insert(id.clone(), *width);
        }
    }

    /// Set the shared height of the pinned row.
    pub(crate) fn set_top_height(&mut self, height: Option<u32>) { self.top_height = height; }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<WidgetId> { names.iter().map(|n| WidgetId::from(*n)).collect() }

    fn layout_with_right(names: &[&str]) -> RoomLayout {
        let mut layout = RoomLayout::new();
        for id in ids(names) {
            layout.append(Container::Right, id);
        }
        layout
    }

    #[test]
    fn test_new_layout_is_empty() {
        let layout = RoomLayout::new();
        assert!(layout.is_empty());
        assert!(!layout.has_explicit_placements());
        assert_eq!(layout.top_height(), None);
    }

    #[test]
    fn test_append_to_center_evicts_occupant() {
        let mut layout = RoomLayout::new();
        assert_eq!(layout.append(Container::Center, "a".into()), None);
        assert_eq!(layout.append(Container::Center, "b".into()), Some("a".into()));

        assert_eq!(layout.widgets(Container::Center), ids(&["b"]).as_slice());
        assert_eq!(layout.widgets(Container::Right), ids(&["a"]).as_slice());
    }

    #[test]
    fn test_remove_drops_width() {
        let mut layout = RoomLayout::new();
        layout.append(Container::Top, "a".into());
        layout.set_top_widths(&[40]);
        assert_eq!(layout.width(&"a".into()), Some(40));

        assert_eq!(layout.remove(&"a".into()), Some(Container::Top));
        assert_eq!(layout.width(&"a".into()), None);
        assert!(layout.is_empty());
    }

    #[test]
    fn test_can_add_respects_capacity() {
        let mut layout = RoomLayout::new();
        for id in ["a", "b", "c"] {
            assert!(layout.can_add(Container::Top));
            layout.append(Container::Top, id.into());
        }
        assert!(!layout.can_add(Container::Top));
        assert!(layout.can_add(Container::Center));
        layout.append(Container::Center, "d".into());
        assert!(!layout.can_add(Container::Center));
        assert!(layout.can_add(Container::Right));
    }

    #[test]
    fn test_reorder_moves_forward_and_backward() {
        let mut layout = layout_with_right(&["a", "b", "c", "d"]);

        assert!(layout.reorder(Container::Right, &"a".into(), 2));
        assert_eq!(layout.widgets(Container::Right), ids(&["b", "c", "a", "d"]).as_slice());

        assert!(layout.reorder(Container::Right, &"d".into(), 0));
        assert_eq!(layout.widgets(Container::Right), ids(&["d", "b", "c", "a"]).as_slice());
    }

    #[test]
    fn test_reorder_clamps_target() {
        let mut layout = layout_with_right(&["a", "b", "c"]);
        assert!(layout.reorder(Container::Right, &"a".into(), 99));
        assert_eq!(layout.widgets(Container::Right), ids(&["b", "c", "a"]).as_slice());
    }

    #[test]
    fn test_reorder_unknown_widget_is_noop() {
        let mut layout = layout_with_right(&["a", "b"]);
        assert!(!layout.reorder(Container::Right, &"zzz".into(), 0));
        assert!(!layout.reorder(Container::Top, &"a".into(), 0));
        assert_eq!(layout.widgets(Container::Right), ids(&["a", "b"]).as_slice());
    }

    #[test]
    fn test_placement_reports_top_sizes() {
        let mut layout = RoomLayout::new();
        layout.append(Container::Top, "a".into());
        layout.append(Container::Top, "b".into());
        layout.set_top_widths(&[30, 70]);
        layout.set_top_height(Some(25));
        layout.append(Container::Right, "c".into());

        let placement = layout.placement(&"b".into()).unwrap();
        assert_eq!(placement.container, Container::Top);
        assert_eq!(placement.index, 1);
        assert_eq!(placement.width, Some(70));
        assert_eq!(placement.height, Some(25));

        let placement = layout.placement(&"c".into()).unwrap();
        assert_eq!(placement.container, Container::Right);
        assert_eq!(placement.width, None);
        assert_eq!(placement.height, None);
    }

    #[test]
    fn test_from_parts_drops_widths_of_unpinned_widgets() {
        let mut widths = BTreeMap::new();
        widths.insert(WidgetId::from("a"), 50);
        widths.insert(WidgetId::from("gone"), 50);

        let layout = RoomLayout::from_parts(
            ids(&["a"]).into_iter().collect(),
            None,
            Vec::new(),
            widths,
            None,
        );
        assert_eq!(layout.width(&"a".into()), Some(50));
        assert_eq!(layout.width(&"gone".into()), None);
    }
}
