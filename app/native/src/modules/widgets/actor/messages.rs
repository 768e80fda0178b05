//! Message types for the layout actor.
//!
//! Every interaction with the actor goes through these messages. Mutations
//! that can fail carry a `respond_to` channel so the caller learns the
//! outcome; registry and shared-state notifications are fire-and-forget.

use eyeball::Subscriber;
use tokio::sync::{oneshot, watch};

use crate::error::LayoutError;
use crate::modules::widgets::state::{Container, Placement, RoomId, RoomLayout, SessionStatus, WidgetId};

/// Responder for mutations that may be rejected.
pub type MutationResponder = oneshot::Sender<Result<(), LayoutError>>;

/// Messages processed by the layout actor.
pub enum LayoutMessage {
    // ========================================================================
    // External notifications
    // ========================================================================
    /// The widgets attached to a room changed.
    WidgetsChanged { room: RoomId },

    /// Another session wrote the persisted layout of a room.
    PersistedLayoutChanged { room: RoomId },

    // ========================================================================
    // Mutations
    // ========================================================================
    /// Move a widget into a container.
    MoveToContainer {
        room: RoomId,
        widget: WidgetId,
        container: Container,
        respond_to: MutationResponder,
    },

    /// Reorder a widget within its container. Responds with whether the order changed.
    MoveWithinContainer {
        room: RoomId,
        container: Container,
        widget: WidgetId,
        target: usize,
        respond_to: oneshot::Sender<bool>,
    },

    /// Set or reset the shared height of a container.
    SetContainerHeight {
        room: RoomId,
        container: Container,
        height: Option<u32>,
        respond_to: MutationResponder,
    },

    /// Apply resizer positions to a container.
    SetResizerDistributions {
        room: RoomId,
        container: Container,
        distributions: Vec<String>,
        respond_to: MutationResponder,
    },

    /// Write the full layout of a room to shared state.
    CopyLayoutToRoom { room: RoomId },

    // ========================================================================
    // Queries & Subscriptions
    // ========================================================================
    /// Run a read-only query.
    Query {
        query: LayoutQuery,
        respond_to: oneshot::Sender<QueryResult>,
    },

    /// Subscribe to `update_<room>` events.
    Subscribe {
        room: RoomId,
        respond_to: oneshot::Sender<Subscriber<u64>>,
    },

    // ========================================================================
    // Lifecycle
    // ========================================================================
    /// Compute every visible room and follow the session status.
    ///
    /// Responds `false` if the actor was already started.
    Start {
        session: watch::Receiver<SessionStatus>,
        respond_to: oneshot::Sender<bool>,
    },

    /// Stop the actor.
    Shutdown,
}

impl LayoutMessage {
    /// Returns the message type name.
    ///
    /// Used for logging, especially in panic recovery.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::WidgetsChanged { .. } => "WidgetsChanged",
            Self::PersistedLayoutChanged { .. } => "PersistedLayoutChanged",
            Self::MoveToContainer { .. } => "MoveToContainer",
            Self::MoveWithinContainer { .. } => "MoveWithinContainer",
            Self::SetContainerHeight { .. } => "SetContainerHeight",
            Self::SetResizerDistributions { .. } => "SetResizerDistributions",
            Self::CopyLayoutToRoom { .. } => "CopyLayoutToRoom",
            Self::Query { .. } => "Query",
            Self::Subscribe { .. } => "Subscribe",
            Self::Start { .. } => "Start",
            Self::Shutdown => "Shutdown",
        }
    }
}

/// Read-only queries against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutQuery {
    /// Full layout of a room.
    RoomLayout { room: RoomId },
    /// Members of a container.
    ContainerWidgets { room: RoomId, container: Container },
    /// Placement of a widget.
    Placement { room: RoomId, widget: WidgetId },
    /// Whether a container accepts another widget.
    CanAddToContainer { room: RoomId, container: Container },
    /// Shared height of a container.
    ContainerHeight { room: RoomId, container: Container },
    /// Cumulative resizer positions of a container.
    ResizerDistributions { room: RoomId, container: Container },
    /// Number of update events fired for a room.
    Revision { room: RoomId },
}

/// Results from queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    RoomLayout(RoomLayout),
    Widgets(Vec<WidgetId>),
    Placement(Option<Placement>),
    Bool(bool),
    Height(Option<u32>),
    Distributions(Vec<String>),
    Revision(u64),
}

impl QueryResult {
    /// Try to get a room layout from the result.
    #[must_use]
    pub fn into_room_layout(self) -> Option<RoomLayout> {
        match self {
            Self::RoomLayout(layout) => Some(layout),
            _ => None,
        }
    }

    /// Try to get widget ids from the result.
    #[must_use]
    pub fn into_widgets(self) -> Option<Vec<WidgetId>> {
        match self {
            Self::Widgets(widgets) => Some(widgets),
            _ => None,
        }
    }

    /// Try to get a placement from the result.
    #[must_use]
    pub fn into_placement(self) -> Option<Option<Placement>> {
        match self {
            Self::Placement(placement) => Some(placement),
            _ => None,
        }
    }

    /// Try to get a flag from the result.
    #[must_use]
    pub fn into_bool(self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(value),
            _ => None,
        }
    }

    /// Try to get a height from the result.
    #[must_use]
    pub fn into_height(self) -> Option<Option<u32>> {
        match self {
            Self::Height(height) => Some(height),
            _ => None,
        }
    }

    /// Try to get resizer positions from the result.
    #[must_use]
    pub fn into_distributions(self) -> Option<Vec<String>> {
        match self {
            Self::Distributions(distributions) => Some(distributions),
            _ => None,
        }
    }

    /// Try to get a revision counter from the result.
    #[must_use]
    pub fn into_revision(self) -> Option<u64> {
        match self {
            Self::Revision(revision) => Some(revision),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names() {
        let room = RoomId::from("!r:hs");
        assert_eq!(LayoutMessage::WidgetsChanged { room: room.clone() }.name(), "WidgetsChanged");
        assert_eq!(LayoutMessage::CopyLayoutToRoom { room }.name(), "CopyLayoutToRoom");
        assert_eq!(LayoutMessage::Shutdown.name(), "Shutdown");
    }

    #[test]
    fn test_query_result_accessors() {
        assert_eq!(QueryResult::Bool(true).into_bool(), Some(true));
        assert_eq!(QueryResult::Revision(3).into_revision(), Some(3));
        assert_eq!(QueryResult::Revision(3).into_bool(), None);
        assert_eq!(QueryResult::Height(None).into_height(), Some(None));
        assert!(QueryResult::Widgets(Vec::new()).into_distributions().is_none());
    }
}
