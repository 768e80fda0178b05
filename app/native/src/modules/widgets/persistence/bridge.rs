//! Write-through bridge between the layout store and a persistence backend.
//!
//! Writes are queued on an unbounded channel and applied by a
//! `PersistenceWorker`, either on its own task or by draining the queue
//! synchronously. The store never waits for a write: a failed or slow write
//! does not roll back the in-memory layout.
//!
//! The bridge keeps a local echo of the last layout written for each room.
//! Reads prefer the echo so a recalculation that happens before the worker
//! catches up still sees this session's latest arrangement.
//!
//! ```text
//! LayoutStore ──write()──▶ echo + mpsc queue ──▶ PersistenceWorker ──▶ backend
//!      ▲                        │
//!      └──────── read() ────────┘ (echo first, then backend)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::PersistenceError;
use super::format::PersistedLayout;
use crate::modules::widgets::state::RoomId;

/// Storage for persisted room layouts.
pub trait LayoutPersistence: Send + Sync {
    /// Read the raw persisted layout of a room, `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, room: &RoomId) -> Result<Option<serde_json::Value>, PersistenceError>;

    /// Replace the persisted layout of a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn write(&self, room: &RoomId, layout: &PersistedLayout) -> Result<(), PersistenceError>;
}

/// A queued write.
#[derive(Debug, Clone)]
pub struct PersistRequest {
    /// Room whose layout is written.
    pub room: RoomId,
    /// Layout to store.
    pub layout: PersistedLayout,
}

/// Store-side half of the bridge.
pub struct PersistenceBridge {
    backend: Arc<dyn LayoutPersistence>,
    echo: HashMap<RoomId, PersistedLayout>,
    queue: mpsc::UnboundedSender<PersistRequest>,
}

impl PersistenceBridge {
    /// Create a bridge and the worker that applies its writes.
    #[must_use]
    pub fn new(backend: Arc<dyn LayoutPersistence>) -> (Self, PersistenceWorker) {
        let (queue, receiver) = mpsc::unbounded_channel();
        let bridge = Self {
            backend: Arc::clone(&backend),
            echo: HashMap::new(),
            queue,
        };
        (bridge, PersistenceWorker { backend, receiver })
    }

    /// Read the persisted layout of a room.
    ///
    /// Prefers the local echo. Backend errors are logged and treated as an
    /// empty layout so recalculation can proceed.
    #[must_use]
    pub fn read(&self, room: &RoomId) -> PersistedLayout {
        if let Some(echo) = self.echo.get(room) {
            return echo.clone();
        }

        match self.backend.read(room) {
            Ok(Some(value)) => PersistedLayout::from_value(&value),
            Ok(None) => PersistedLayout::new(),
            Err(err) => {
                tracing::warn!(room = %room, error = %err, "failed to read persisted layout");
                PersistedLayout::new()
            }
        }
    }

    /// Queue a write-through of a room layout.
    ///
    /// Fire-and-forget: if the worker is gone the write is dropped and logged.
    pub fn write(&mut self, room: &RoomId, layout: PersistedLayout) {
        self.echo.insert(room.clone(), layout.clone());

        let request = PersistRequest {
            room: room.clone(),
            layout,
        };
        if self.queue.send(request).is_err() {
            tracing::warn!(room = %room, "persistence worker stopped, layout write dropped");
        }
    }

    /// Forget the local echo of a room so the next read hits the backend.
    ///
    /// Call this when another session has written the room layout.
    pub fn invalidate(&mut self, room: &RoomId) { self.echo.remove(room); }

    /// Forget every local echo.
    pub fn invalidate_all(&mut self) { self.echo.clear(); }
}

/// Backend-side half of the bridge.
pub struct PersistenceWorker {
    backend: Arc<dyn LayoutPersistence>,
    receiver: mpsc::UnboundedReceiver<PersistRequest>,
}

impl PersistenceWorker {
    /// Apply queued writes until the bridge is dropped.
    pub async fn run(mut self) {
        tracing::trace!("persistence worker starting");
        while let Some(request) = self.receiver.recv().await {
            self.apply(&request);
        }
        tracing::debug!("persistence worker channel closed, exiting");
    }

    /// Apply every write queued so far without waiting.
    ///
    /// Returns the number of writes applied (successful or not).
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(request) = self.receiver.try_recv() {
            self.apply(&request);
            applied += 1;
        }
        applied
    }

    fn apply(&self, request: &PersistRequest) {
        match self.backend.write(&request.room, &request.layout) {
            Ok(()) => tracing::trace!(room = %request.room, "persisted room layout"),
            Err(err) => {
                tracing::warn!(room = %request.room, error = %err, "failed to persist room layout");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::modules::widgets::persistence::MemoryPersistence;

    /// Backend that rejects every write.
    struct FailingBackend;

    impl LayoutPersistence for FailingBackend {
        fn read(&self, _room: &RoomId) -> Result<Option<serde_json::Value>, PersistenceError> {
            Err(PersistenceError::Backend("offline".to_string()))
        }

        fn write(&self, _room: &RoomId, _layout: &PersistedLayout) -> Result<(), PersistenceError> {
            Err(PersistenceError::Backend("offline".to_string()))
        }
    }

    #[test]
    fn test_write_is_applied_on_drain() {
        let backend = Arc::new(MemoryPersistence::new());
        let (mut bridge, mut worker) = PersistenceBridge::new(backend.clone());
        let room = RoomId::from("!r:hs");

        let layout = PersistedLayout::from_value(&json!({ "a": { "container": "top" } }));
        bridge.write(&room, layout.clone());

        assert!(backend.get(&room).is_none());
        assert_eq!(worker.drain(), 1);
        assert_eq!(backend.get(&room), Some(layout.to_value()));
    }

    #[test]
    fn test_read_prefers_local_echo() {
        let backend = Arc::new(MemoryPersistence::new());
        let room = RoomId::from("!r:hs");
        backend.set(&room, json!({ "a": { "container": "center" } }));

        let (mut bridge, _worker) = PersistenceBridge::new(backend);
        let echo = PersistedLayout::from_value(&json!({ "a": { "container": "top" } }));
        bridge.write(&room, echo.clone());

        assert_eq!(bridge.read(&room), echo);

        bridge.invalidate(&room);
        let from_backend = bridge.read(&room);
        assert_eq!(from_backend.entry(&"a".into()).unwrap().container_or_default().as_str(), "center");
    }

    #[test]
    fn test_backend_failures_do_not_propagate() {
        let (mut bridge, mut worker) = PersistenceBridge::new(Arc::new(FailingBackend));
        let room = RoomId::from("!r:hs");

        assert!(bridge.read(&room).is_empty());
        bridge.write(&room, PersistedLayout::new());
        assert_eq!(worker.drain(), 1);
    }

    #[test]
    fn test_write_after_worker_dropped_is_logged_not_fatal() {
        let (mut bridge, worker) = PersistenceBridge::new(Arc::new(MemoryPersistence::new()));
        drop(worker);
        bridge.write(&RoomId::from("!r:hs"), PersistedLayout::new());
    }

    #[tokio::test]
    async fn test_worker_run_exits_when_bridge_dropped() {
        let backend = Arc::new(MemoryPersistence::new());
        let (mut bridge, worker) = PersistenceBridge::new(backend.clone());
        let room = RoomId::from("!r:hs");
        bridge.write(&room, PersistedLayout::new());
        drop(bridge);

        worker.run().await;
        assert_eq!(backend.get(&room), Some(json!({})));
    }
}
