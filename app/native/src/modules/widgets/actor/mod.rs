//! Layout actor module.
//!
//! The layout actor owns the `LayoutStore` and processes messages
//! sequentially on one tokio task. Registry-driven recalculation and user
//! mutations therefore never interleave, and the store needs no locks.
//!
//! Once started, the actor also follows the session status channel: when
//! the session stops being viable every populated room is cleared.
//!
//! # Panic Recovery
//!
//! If a message handler panics, the panic is caught and logged and the
//! actor keeps processing subsequent messages. A dropped responder makes
//! the waiting caller observe [`ActorError::ReceiveFailed`].

mod handle;
mod messages;

use std::panic::{AssertUnwindSafe, catch_unwind};

pub use handle::{ActorError, LayoutActorHandle};
pub use messages::{LayoutMessage, LayoutQuery, MutationResponder, QueryResult};
use tokio::sync::{mpsc, watch};

use super::state::SessionStatus;
use super::store::LayoutStore;

/// Channel buffer size for the layout actor.
const CHANNEL_BUFFER_SIZE: usize = 256;

/// Outcome of one wait of the actor loop.
enum Wakeup {
    Message(Option<LayoutMessage>),
    Session(Option<SessionStatus>),
}

/// The actor that owns every room layout.
pub struct LayoutActor {
    store: LayoutStore,
    receiver: mpsc::Receiver<LayoutMessage>,
    session: Option<watch::Receiver<SessionStatus>>,
}

impl LayoutActor {
    /// Spawn the actor on the current tokio runtime and return its handle.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(store: LayoutStore) -> LayoutActorHandle {
        tracing::debug!("widgets: spawning layout actor");
        let (sender, receiver) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let actor = Self {
            store,
            receiver,
            session: None,
        };
        tokio::spawn(actor.run());

        LayoutActorHandle::new(sender)
    }

    /// Wait for the next message or session status change.
    async fn next_wakeup(&mut self) -> Wakeup {
        let receiver = &mut self.receiver;
        let session = self.session.as_mut();

        tokio::select! {
            msg = receiver.recv() => Wakeup::Message(msg),
            status = async move {
                match session {
                    Some(session) => match session.changed().await {
                        Ok(()) => Some(*session.borrow_and_update()),
                        Err(_) => None,
                    },
                    None => std::future::pending().await,
                }
            } => Wakeup::Session(status),
        }
    }

    /// Run the actor's message loop.
    async fn run(mut self) {
        tracing::trace!("widgets: layout actor loop starting");

        loop {
            match self.next_wakeup().await {
                Wakeup::Message(None) => break,
                Wakeup::Message(Some(LayoutMessage::Shutdown)) => {
                    tracing::debug!("widgets: layout actor received shutdown message");
                    return;
                }
                Wakeup::Message(Some(msg)) => self.dispatch(msg),
                Wakeup::Session(Some(status)) => self.on_session_status(status),
                Wakeup::Session(None) => {
                    tracing::debug!("widgets: session status channel closed");
                    self.session = None;
                }
            }
        }

        tracing::debug!("widgets: layout actor channel closed, exiting");
    }

    /// Handle a message, recovering from panics.
    fn dispatch(&mut self, msg: LayoutMessage) {
        let msg_name = msg.name();
        let result = catch_unwind(AssertUnwindSafe(|| self.handle_message(msg)));

        if let Err(panic_info) = result {
            let panic_msg = panic_info
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic_info.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());

            tracing::error!(handler = msg_name, panic = %panic_msg, "widgets: PANIC in layout actor");
        }
    }

    fn on_session_status(&mut self, status: SessionStatus) {
        tracing::debug!(?status, "widgets: session status changed");
        if status == SessionStatus::NotViable {
            self.store.on_session_not_viable();
        }
    }

    /// Handle a single message.
    fn handle_message(&mut self, msg: LayoutMessage) {
        match msg {
            LayoutMessage::WidgetsChanged { room } => self.store.on_widgets_changed(&room),
            LayoutMessage::PersistedLayoutChanged { room } => {
                self.store.on_persisted_layout_changed(&room);
            }

            LayoutMessage::MoveToContainer {
                room,
                widget,
                container,
                respond_to,
            } => {
                let result = self.store.move_to_container(&room, &widget, container);
                if let Err(ref err) = result {
                    tracing::debug!(room = %room, widget = %widget, error = %err, "move rejected");
                }
                respond(respond_to, result);
            }
            LayoutMessage::MoveWithinContainer {
                room,
                container,
                widget,
                target,
                respond_to,
            } => {
                let changed = self.store.move_within_container(&room, container, &widget, target);
                respond(respond_to, changed);
            }
            LayoutMessage::SetContainerHeight {
                room,
                container,
                height,
                respond_to,
            } => {
                let result = self.store.set_container_height(&room, container, height);
                respond(respond_to, result);
            }
            LayoutMessage::SetResizerDistributions {
                room,
                container,
                distributions,
                respond_to,
            } => {
                let result = self.store.set_resizer_distributions(&room, container, &distributions);
                respond(respond_to, result);
            }
            LayoutMessage::CopyLayoutToRoom { room } => self.store.copy_layout_to_room(&room),

            LayoutMessage::Query { query, respond_to } => {
                let result = self.execute_query(query);
                respond(respond_to, result);
            }
            LayoutMessage::Subscribe { room, respond_to } => {
                respond(respond_to, self.store.subscribe(&room));
            }

            LayoutMessage::Start { session, respond_to } => {
                let started = self.store.start();
                if started {
                    let status = *session.borrow();
                    self.session = Some(session);
                    if status == SessionStatus::NotViable {
                        self.store.on_session_not_viable();
                    }
                } else {
                    tracing::debug!("widgets: ignoring repeated start");
                }
                respond(respond_to, started);
            }

            // Handled by the run loop.
            LayoutMessage::Shutdown => {}
        }
    }

    fn execute_query(&mut self, query: LayoutQuery) -> QueryResult {
        match query {
            LayoutQuery::RoomLayout { room } => QueryResult::RoomLayout(self.store.room_layout(&room).clone()),
            LayoutQuery::ContainerWidgets { room, container } => {
                QueryResult::Widgets(self.store.get_container_widgets(&room, container))
            }
            LayoutQuery::Placement { room, widget } => {
                QueryResult::Placement(self.store.placement(&room, &widget))
            }
            LayoutQuery::CanAddToContainer { room, container } => {
                QueryResult::Bool(self.store.can_add_to_container(&room, container))
            }
            LayoutQuery::ContainerHeight { room, container } => {
                QueryResult::Height(self.store.get_container_height(&room, container))
            }
            LayoutQuery::ResizerDistributions { room, container } => {
                QueryResult::Distributions(self.store.get_resizer_distributions(&room, container))
            }
            LayoutQuery::Revision { room } => QueryResult::Revision(self.store.revision(&room)),
        }
    }
}

/// Send a response, logging if the caller went away.
fn respond<T>(respond_to: tokio::sync::oneshot::Sender<T>, value: T) {
    if respond_to.send(value).is_err() {
        tracing::warn!("widgets: failed to send response (channel closed)");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::LayoutError;
    use crate::modules::widgets::persistence::{MemoryPersistence, PersistenceBridge};
    use crate::modules::widgets::registry::StaticRegistry;
    use crate::modules::widgets::state::{Container, RoomId, Widget, WidgetId};

    fn spawn_actor(widgets: &[&str]) -> (LayoutActorHandle, Arc<StaticRegistry>, RoomId) {
        let room = RoomId::from("!room:hs");
        let registry = Arc::new(StaticRegistry::new());
        registry.set_widgets(&room, widgets.iter().map(|id| Widget::new(*id, room.clone())).collect());
        let (bridge, worker) = PersistenceBridge::new(Arc::new(MemoryPersistence::new()));
        tokio::spawn(worker.run());

        let handle = LayoutActor::spawn(LayoutStore::new(registry.clone(), bridge));
        (handle, registry, room)
    }

    fn ids(names: &[&str]) -> Vec<WidgetId> { names.iter().map(|n| WidgetId::from(*n)).collect() }

    #[tokio::test]
    async fn test_actor_spawn_and_shutdown() {
        let (handle, _, _) = spawn_actor(&[]);
        assert!(handle.is_alive());

        handle.shutdown().unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!handle.is_alive());
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let (handle, _, room) = spawn_actor(&["1"]);
        let (_tx, rx) = watch::channel(SessionStatus::Viable);

        assert!(handle.start(rx.clone()).await.unwrap());
        assert_eq!(handle.revision(room.clone()).await.unwrap(), 1);

        assert!(!handle.start(rx).await.unwrap());
        assert_eq!(handle.revision(room).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_moves_through_handle() {
        let (handle, _, room) = spawn_actor(&["1", "2", "3", "4"]);

        for id in ["1", "2", "3"] {
            handle.move_to_container(room.clone(), id.into(), Container::Top).await.unwrap().unwrap();
        }
        let rejected = handle
            .move_to_container(room.clone(), "4".into(), Container::Top)
            .await
            .unwrap();
        assert!(matches!(rejected, Err(LayoutError::CapacityExceeded { .. })));

        assert!(handle.move_within_container(room.clone(), Container::Top, "1".into(), 2).await.unwrap());
        assert_eq!(
            handle.container_widgets(room.clone(), Container::Top).await.unwrap(),
            ids(&["2", "3", "1"])
        );
        assert_eq!(
            handle.resizer_distributions(room.clone(), Container::Top).await.unwrap(),
            vec!["33.3%", "66.7%"]
        );
        assert!(!handle.can_add_to_container(room, Container::Top).await.unwrap());
    }

    #[tokio::test]
    async fn test_widgets_changed_recalculates() {
        let (handle, registry, room) = spawn_actor(&["1"]);
        assert_eq!(handle.container_widgets(room.clone(), Container::Right).await.unwrap(), ids(&["1"]));

        registry.add_widget(Widget::new("2", room.clone()));
        handle.widgets_changed(room.clone()).unwrap();
        assert_eq!(
            handle.container_widgets(room.clone(), Container::Right).await.unwrap(),
            ids(&["1", "2"])
        );
        assert_eq!(handle.revision(room).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_session_not_viable_clears_rooms() {
        let (handle, _, room) = spawn_actor(&["1"]);
        let (tx, rx) = watch::channel(SessionStatus::Viable);
        handle.start(rx).await.unwrap();
        handle.move_to_container(room.clone(), "1".into(), Container::Center).await.unwrap().unwrap();

        tx.send(SessionStatus::NotViable).unwrap();
        // Let the actor observe the status change.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let layout = handle.room_layout(room).await.unwrap();
        assert!(layout.is_empty());
    }

    #[tokio::test]
    async fn test_subscriber_sees_updates() {
        let (handle, _, room) = spawn_actor(&["1"]);
        let mut subscriber = handle.subscribe(room.clone()).await.unwrap();

        handle.move_to_container(room, "1".into(), Container::Top).await.unwrap().unwrap();
        assert_eq!(subscriber.next().await, Some(1));
    }
}
