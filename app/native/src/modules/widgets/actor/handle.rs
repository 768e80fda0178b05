//! Handle for communicating with the layout actor.
//!
//! The `LayoutActorHandle` provides a cloneable interface for sending
//! messages to the layout actor and awaiting their outcome.

use std::time::Duration;

use eyeball::Subscriber;
use tokio::sync::{mpsc, oneshot, watch};

use super::messages::{LayoutMessage, LayoutQuery, QueryResult};
use crate::error::LayoutError;
use crate::modules::widgets::state::{Container, Placement, RoomId, RoomLayout, SessionStatus, WidgetId};

/// Error types for actor communication.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    /// Failed to send message to actor.
    #[error("Failed to send message to actor: channel closed")]
    SendFailed,

    /// Failed to receive response from actor.
    #[error("Failed to receive response from actor: channel closed")]
    ReceiveFailed,

    /// Query timed out.
    #[error("Query timed out after {0:?}")]
    Timeout(Duration),

    /// The actor answered a query with a result of the wrong kind.
    #[error("Unexpected response to query '{0}'")]
    UnexpectedResponse(&'static str),
}

/// Handle for communicating with the layout actor.
///
/// This handle is cheap to clone and can be shared across tasks.
#[derive(Clone)]
pub struct LayoutActorHandle {
    sender: mpsc::Sender<LayoutMessage>,
}

impl LayoutActorHandle {
    /// Create a new handle with the given sender.
    pub(crate) const fn new(sender: mpsc::Sender<LayoutMessage>) -> Self { Self { sender } }

    // ========================================================================
    // Sending
    // ========================================================================

    /// Send a message to the actor without waiting for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed or full.
    pub fn send(&self, msg: LayoutMessage) -> Result<(), ActorError> {
        self.sender.try_send(msg).map_err(|_| ActorError::SendFailed)
    }

    /// Send a message built around a responder and wait for the response.
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> LayoutMessage,
    ) -> Result<T, ActorError> {
        let (tx, rx) = oneshot::channel();
        self.sender.send(build(tx)).await.map_err(|_| ActorError::SendFailed)?;
        rx.await.map_err(|_| ActorError::ReceiveFailed)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Compute every visible room and start following the session status.
    ///
    /// Returns `false` if the actor was already started; the new session
    /// receiver is ignored in that case.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn start(&self, session: watch::Receiver<SessionStatus>) -> Result<bool, ActorError> {
        self.request(|respond_to| LayoutMessage::Start { session, respond_to }).await
    }

    /// Stop the actor.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has already stopped.
    pub fn shutdown(&self) -> Result<(), ActorError> { self.send(LayoutMessage::Shutdown) }

    /// Check if the actor is still running.
    #[must_use]
    pub fn is_alive(&self) -> bool { !self.sender.is_closed() }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Report that the widgets of a room changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub fn widgets_changed(&self, room: RoomId) -> Result<(), ActorError> {
        self.send(LayoutMessage::WidgetsChanged { room })
    }

    /// Report that another session wrote the layout of a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub fn persisted_layout_changed(&self, room: RoomId) -> Result<(), ActorError> {
        self.send(LayoutMessage::PersistedLayoutChanged { room })
    }

    /// Subscribe to `update_<room>` events.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn subscribe(&self, room: RoomId) -> Result<Subscriber<u64>, ActorError> {
        self.request(|respond_to| LayoutMessage::Subscribe { room, respond_to }).await
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Move a widget into a container.
    ///
    /// The outer result reports actor failures, the inner one the mutation outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn move_to_container(
        &self,
        room: RoomId,
        widget: WidgetId,
        container: Container,
    ) -> Result<Result<(), LayoutError>, ActorError> {
        self.request(|respond_to| LayoutMessage::MoveToContainer {
            room,
            widget,
            container,
            respond_to,
        })
        .await
    }

    /// Reorder a widget within its container.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn move_within_container(
        &self,
        room: RoomId,
        container: Container,
        widget: WidgetId,
        target: usize,
    ) -> Result<bool, ActorError> {
        self.request(|respond_to| LayoutMessage::MoveWithinContainer {
            room,
            container,
            widget,
            target,
            respond_to,
        })
        .await
    }

    /// Set or reset the shared height of a container.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn set_container_height(
        &self,
        room: RoomId,
        container: Container,
        height: Option<u32>,
    ) -> Result<Result<(), LayoutError>, ActorError> {
        self.request(|respond_to| LayoutMessage::SetContainerHeight {
            room,
            container,
            height,
            respond_to,
        })
        .await
    }

    /// Apply resizer positions to a container.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn set_resizer_distributions(
        &self,
        room: RoomId,
        container: Container,
        distributions: Vec<String>,
    ) -> Result<Result<(), LayoutError>, ActorError> {
        self.request(|respond_to| LayoutMessage::SetResizerDistributions {
            room,
            container,
            distributions,
            respond_to,
        })
        .await
    }

    /// Write the full layout of a room to shared state.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub fn copy_layout_to_room(&self, room: RoomId) -> Result<(), ActorError> {
        self.send(LayoutMessage::CopyLayoutToRoom { room })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Execute a query and wait for the result.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed, or
    /// [`ActorError::ReceiveFailed`] if the response channel is closed.
    pub async fn query(&self, query: LayoutQuery) -> Result<QueryResult, ActorError> {
        self.request(|respond_to| LayoutMessage::Query { query, respond_to }).await
    }

    /// Execute a query with a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Timeout`] if the query doesn't complete in time,
    /// or any error from [`Self::query`].
    pub async fn query_timeout(
        &self,
        query: LayoutQuery,
        timeout: Duration,
    ) -> Result<QueryResult, ActorError> {
        tokio::time::timeout(timeout, self.query(query))
            .await
            .map_err(|_| ActorError::Timeout(timeout))?
    }

    /// Get the full layout of a room.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn room_layout(&self, room: RoomId) -> Result<RoomLayout, ActorError> {
        self.query(LayoutQuery::RoomLayout { room })
            .await?
            .into_room_layout()
            .ok_or(ActorError::UnexpectedResponse("RoomLayout"))
    }

    /// Get the members of a container.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn container_widgets(
        &self,
        room: RoomId,
        container: Container,
    ) -> Result<Vec<WidgetId>, ActorError> {
        self.query(LayoutQuery::ContainerWidgets { room, container })
            .await?
            .into_widgets()
            .ok_or(ActorError::UnexpectedResponse("ContainerWidgets"))
    }

    /// Get the placement of a widget.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn placement(&self, room: RoomId, widget: WidgetId) -> Result<Option<Placement>, ActorError> {
        self.query(LayoutQuery::Placement { room, widget })
            .await?
            .into_placement()
            .ok_or(ActorError::UnexpectedResponse("Placement"))
    }

    /// Check if a container accepts another widget.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn can_add_to_container(&self, room: RoomId, container: Container) -> Result<bool, ActorError> {
        self.query(LayoutQuery::CanAddToContainer { room, container })
            .await?
            .into_bool()
            .ok_or(ActorError::UnexpectedResponse("CanAddToContainer"))
    }

    /// Get the shared height of a container.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn container_height(
        &self,
        room: RoomId,
        container: Container,
    ) -> Result<Option<u32>, ActorError> {
        self.query(LayoutQuery::ContainerHeight { room, container })
            .await?
            .into_height()
            .ok_or(ActorError::UnexpectedResponse("ContainerHeight"))
    }

    /// Get the cumulative resizer positions of a container.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn resizer_distributions(
        &self,
        room: RoomId,
        container: Container,
    ) -> Result<Vec<String>, ActorError> {
        self.query(LayoutQuery::ResizerDistributions { room, container })
            .await?
            .into_distributions()
            .ok_or(ActorError::UnexpectedResponse("ResizerDistributions"))
    }

    /// Get the number of update events fired for a room.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn revision(&self, room: RoomId) -> Result<u64, ActorError> {
        self.query(LayoutQuery::Revision { room })
            .await?
            .into_revision()
            .ok_or(ActorError::UnexpectedResponse("Revision"))
    }
}

impl std::fmt::Debug for LayoutActorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutActorHandle").field("alive", &self.is_alive()).finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
