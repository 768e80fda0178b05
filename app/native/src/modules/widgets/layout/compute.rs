//! Layout computation.
//!
//! Derives a concrete `RoomLayout` from the widgets currently attached to a
//! room and the layout persisted in shared room state. The computation is
//! pure and deterministic: the same widget list and persisted layout always
//! produce the same arrangement, which keeps concurrent viewers consistent.

use std::collections::{BTreeMap, HashSet};

use crate::constants::MAX_PINNED_WIDGETS;
use crate::modules::widgets::persistence::PersistedLayout;
use crate::modules::widgets::state::{Container, PinnedIds, RoomLayout, Widget, WidgetId};

/// Computes the layout of a room.
///
/// # Algorithm
///
/// 1. Deduplicate widgets by id, keeping registry order.
/// 2. Collect widgets persisted in `Top` and `Center`; entries for widgets
///    that are no longer present are ignored.
/// 3. Order each group by `(index, widget id)`. Keep the first 3 pinned and
///    the first maximized; the overflow falls back to `Right`.
/// 4. Everything else goes to `Right` in registry order.
/// 5. Pinned widths come from the persisted entries. The row height is the
///    largest persisted height, or `previous_height` if none is persisted.
///
/// # Arguments
///
/// * `widgets` - Widgets attached to the room, in registry order
/// * `persisted` - Layout read from shared room state
/// * `previous_height` - Row height of the layout being replaced
#[must_use]
pub fn compute_room_layout(
    widgets: &[Widget],
    persisted: &PersistedLayout,
    previous_height: Option<u32>,
) -> RoomLayout {
    let mut seen = HashSet::new();
    let present: Vec<&WidgetId> = widgets.iter().map(|w| &w.id).filter(|id| seen.insert(*id)).collect();

    let mut pinned: Vec<(u32, &WidgetId)> = Vec::new();
    let mut maximised: Vec<(u32, &WidgetId)> = Vec::new();
    for &id in &present {
        let Some(entry) = persisted.entry(id) else {
            continue;
        };
        match entry.container_or_default() {
            Container::Top => pinned.push((entry.index_or_default(), id)),
            Container::Center => maximised.push((entry.index_or_default(), id)),
            Container::Right => {}
        }
    }
    pinned.sort_unstable();
    maximised.sort_unstable();

    if pinned.len() > MAX_PINNED_WIDGETS {
        tracing::debug!(
            pinned = pinned.len(),
            "persisted layout exceeds pinned capacity, moving overflow to the sidebar"
        );
    }
    if maximised.len() > 1 {
        tracing::debug!(
            maximised = maximised.len(),
            "persisted layout has several maximized widgets, keeping the first"
        );
    }

    let top: PinnedIds = pinned
        .iter()
        .take(MAX_PINNED_WIDGETS)
        .map(|(_, id)| (*id).clone())
        .collect();
    let center: Option<WidgetId> = maximised.first().map(|(_, id)| (*id).clone());

    let mut right = Vec::with_capacity(present.len());
    for &id in &present {
        if !top.contains(id) && center.as_ref() != Some(id) {
            right.push(id.clone());
        }
    }

    let mut widths = BTreeMap::new();
    let mut height: Option<u32> = None;
    for id in &top {
        if let Some(entry) = persisted.entry(id) {
            if let Some(width) = entry.width {
                widths.insert(id.clone(), width);
            }
            height = height.max(entry.height);
        }
    }

    RoomLayout::from_parts(top, center, right, widths, height.or(previous_height))
}

// ============================================================================
// Tests
// ============================================================================
