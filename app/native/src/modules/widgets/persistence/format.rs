//! Persisted layout format.
//!
//! The shared room state holds a JSON object keyed by widget id:
//!
//! ```json
//! {
//!   "etherpad": { "container": "top", "index": 0, "width": 40, "height": 30 },
//!   "jitsi":    { "container": "center", "index": 0 },
//!   "grafana":  { "container": "right" }
//! }
//! ```
//!
//! Reading is lenient: entries that do not deserialize are skipped, so the
//! affected widgets fall back to default placement instead of failing the
//! whole room.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::modules::widgets::layout::rounded_widths;
use crate::modules::widgets::state::{Container, RoomLayout, WidgetId};

/// Persisted placement of one widget.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedEntry {
    /// Container tag. Absent means the default container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,

    /// Ordinal within an ordered container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,

    /// Explicit width of a pinned widget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Shared height of the pinned row, replicated on every pinned widget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl PersistedEntry {
    /// Container the entry asks for, defaulting to `Right`.
    #[must_use]
    pub fn container_or_default(&self) -> Container { self.container.unwrap_or_default() }

    /// Ordinal the entry asks for, defaulting to 0.
    #[must_use]
    pub fn index_or_default(&self) -> u32 { self.index.unwrap_or(0) }
}

/// Layout of a room as stored in shared state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedLayout {
    widgets: BTreeMap<WidgetId, PersistedEntry>,
}

impl PersistedLayout {
    /// Create an empty persisted layout.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Parse a persisted layout from raw shared state, never failing.
    ///
    /// Non-object content yields an empty layout; malformed entries are skipped.
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Self {
        let Some(object) = value.as_object() else {
            if !value.is_null() {
                tracing::debug!("persisted layout is not an object, ignoring");
            }
            return Self::new();
        };

        let widgets = object
            .iter()
            .filter_map(|(id, raw)| match serde_json::from_value::<PersistedEntry>(raw.clone()) {
                Ok(entry) => Some((WidgetId::from(id.as_str()), entry)),
                Err(err) => {
                    tracing::debug!(widget = %id, error = %err, "skipping malformed layout entry");
                    None
                }
            })
            .collect();

        Self { widgets }
    }

    /// Serialize into a JSON value for the persistence backend.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new()))
    }

    /// Entry recorded for a widget.
    #[must_use]
    pub fn entry(&self, id: &WidgetId) -> Option<&PersistedEntry> { self.widgets.get(id) }

    /// Record an entry for a widget, replacing any previous one.
    pub fn insert(&mut self, id: WidgetId, entry: PersistedEntry) { self.widgets.insert(id, entry); }

    /// Iterate over entries in widget id order.
    pub fn iter(&self) -> impl Iterator<Item = (&WidgetId, &PersistedEntry)> { self.widgets.iter() }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize { self.widgets.len() }

    /// Check if nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.widgets.is_empty() }
}

impl PersistedLayout {
    /// Full snapshot of a room layout, as written by "copy layout to room".
    ///
    /// Like the `From<&RoomLayout>` conversion, but every pinned widget
    /// carries its effective share rounded to an integer. The shares sum
    /// to 100, so a reader normalizing them sees the same proportions.
    #[must_use]
    pub fn snapshot(layout: &RoomLayout) -> Self { Self::serialize(layout, true) }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn serialize(layout: &RoomLayout, fill_widths: bool) -> Self {
        let mut persisted = Self::new();

        let filled = if fill_widths { rounded_widths(&layout.effective_top_widths()) } else { Vec::new() };
        for (index, id) in layout.widgets(Container::Top).iter().enumerate() {
            let width = if fill_widths { filled.get(index).copied() } else { layout.width(id) };
            persisted.insert(id.clone(), PersistedEntry {
                container: Some(Container::Top),
                index: Some(index as u32),
                width,
                height: layout.top_height(),
            });
        }

        for (index, id) in layout.widgets(Container::Center).iter().enumerate() {
            persisted.insert(id.clone(), PersistedEntry {
                container: Some(Container::Center),
                index: Some(index as u32),
                ..PersistedEntry::default()
            });
        }

        for id in layout.widgets(Container::Right) {
            persisted.insert(id.clone(), PersistedEntry {
                container: Some(Container::Right),
                ..PersistedEntry::default()
            });
        }

        persisted
    }
}

impl From<&RoomLayout> for PersistedLayout {
    /// Serialize a room layout for write-through.
    ///
    /// Widgets in `Right` only carry their container tag. Pinned widgets
    /// carry their index, their explicit width when one is set and the
    /// shared row height when one is set.
    fn from(layout: &RoomLayout) -> Self { Self::serialize(layout, false) }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_value_reads_entries() {
        let layout = PersistedLayout::from_value(&json!({
            "a": { "container": "top", "index": 1, "width": 40, "height": 30 },
            "b": { "container": "center" },
        }));

        let a = layout.entry(&"a".into()).unwrap();
        assert_eq!(a.container, Some(Container::Top));
        assert_eq!(a.index, Some(1));
        assert_eq!(a.width, Some(40));
        assert_eq!(a.height, Some(30));

        let b = layout.entry(&"b".into()).unwrap();
        assert_eq!(b.container_or_default(), Container::Center);
        assert_eq!(b.index_or_default(), 0);
    }

    #[test]
    fn test_from_value_skips_malformed_entries() {
        let layout = PersistedLayout::from_value(&json!({
            "good": { "container": "top", "index": 0 },
            "bad_container": { "container": "sideways" },
            "bad_index": { "container": "top", "index": "first" },
            "not_an_object": 42,
        }));

        assert_eq!(layout.len(), 1);
        assert!(layout.entry(&"good".into()).is_some());
        assert!(layout.entry(&"bad_container".into()).is_none());
    }

    #[test]
    fn test_from_value_missing_container_defaults_to_right() {
        let layout = PersistedLayout::from_value(&json!({ "a": {} }));
        assert_eq!(layout.entry(&"a".into()).unwrap().container_or_default(), Container::Right);
    }

    #[test]
    fn test_from_value_non_object_is_empty() {
        assert!(PersistedLayout::from_value(&json!([1, 2, 3])).is_empty());
        assert!(PersistedLayout::from_value(&serde_json::Value::Null).is_empty());
    }

    #[test]
    fn test_right_entries_serialize_container_only() {
        let mut layout = PersistedLayout::new();
        layout.insert("r".into(), PersistedEntry {
            container: Some(Container::Right),
            ..PersistedEntry::default()
        });

        assert_eq!(layout.to_value(), json!({ "r": { "container": "right" } }));
    }

    fn sample_layout() -> RoomLayout {
        let mut layout = RoomLayout::new();
        layout.append(Container::Top, "a".into());
        layout.append(Container::Top, "b".into());
        layout.set_top_widths(&[70]);
        layout.append(Container::Center, "c".into());
        layout.append(Container::Right, "d".into());
        layout
    }

    #[test]
    fn test_from_room_layout_keeps_explicit_widths_only() {
        let persisted = PersistedLayout::from(&sample_layout());

        assert_eq!(
            persisted.to_value(),
            json!({
                "a": { "container": "top", "index": 0, "width": 70 },
                "b": { "container": "top", "index": 1 },
                "c": { "container": "center", "index": 0 },
                "d": { "container": "right" },
            })
        );
    }

    #[test]
    fn test_snapshot_fills_effective_widths_and_height() {
        let mut layout = sample_layout();
        layout.set_top_height(Some(40));
        let persisted = PersistedLayout::snapshot(&layout);

        let a = persisted.entry(&"a".into()).unwrap();
        let b = persisted.entry(&"b".into()).unwrap();
        assert_eq!(a.width, Some(58));
        assert_eq!(b.width, Some(42));
        assert_eq!(a.height, Some(40));
        assert_eq!(b.height, Some(40));
        assert_eq!(persisted.to_value()["d"], json!({ "container": "right" }));
    }
}
