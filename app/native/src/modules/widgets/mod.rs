//! Widget layout engine.
//!
//! Arranges the widgets attached to a room into three containers:
//!
//! - `Top`: pinned strip, ordered, at most three widgets sharing one height
//! - `Center`: a single maximized widget
//! - `Right`: the sidebar, where everything else goes
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────────────────────┐   ┌────────────────────┐
//! │WidgetRegistry│──▶│ LayoutStore                │──▶│ PersistenceBridge  │
//! └──────────────┘   │  compute_room_layout()     │   │  echo + mpsc queue │
//!                    │  move/resize/copy          │   └─────────┬──────────┘
//!                    │  NotificationBus           │             ▼
//!                    └─────────────▲──────────────┘   PersistenceWorker ─▶ backend
//!                                  │
//!                           LayoutActor (tokio task) ◀── LayoutActorHandle
//! ```
//!
//! # Modules
//!
//! - `state`: ids, containers and the `RoomLayout` model
//! - `layout`: pure layout computation and resizer math
//! - `persistence`: persisted format, backends and write-through bridge
//! - `registry`: widget registry adapter
//! - `notify`: per-room `update_<roomId>` notifications
//! - `store`: the single-owner layout store
//! - `actor`: tokio actor wrapping the store

pub mod actor;
pub mod layout;
pub mod notify;
pub mod persistence;
pub mod registry;
pub mod state;
pub mod store;

pub use actor::{ActorError, LayoutActor, LayoutActorHandle, LayoutMessage, LayoutQuery, QueryResult};
pub use notify::NotificationBus;
pub use persistence::{
    FilePersistence, LayoutPersistence, MemoryPersistence, PersistedEntry, PersistedLayout,
    PersistenceBridge, PersistenceError, PersistenceWorker,
};
pub use registry::{StaticRegistry, WidgetRegistry};
pub use state::{Container, Placement, RoomId, RoomLayout, SessionStatus, Widget, WidgetId};
pub use store::LayoutStore;
