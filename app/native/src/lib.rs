//! Roomdeck - per-room widget layout engine.
//!
//! Arranges the widgets attached to a room into three containers (a pinned
//! strip, a maximized slot and a sidebar), keeps those arrangements in memory
//! for every visible room, and writes user changes through to a persistence
//! backend without waiting for it.
//!
//! The library exposes the engine (`modules::widgets`), a presence tracker
//! (`modules::presence`) and the `roomdeck` command-line interface.

// Core modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod modules;
pub mod schema;

pub use error::{LayoutError, RoomdeckError};
pub use modules::widgets::{
    Container, LayoutActor, LayoutActorHandle, LayoutStore, Placement, RoomId, RoomLayout,
    SessionStatus, Widget, WidgetId,
};
