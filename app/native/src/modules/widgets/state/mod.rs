//! State module for the widget layout engine.
//!
//! This module contains:
//! - Core types (`RoomId`, `WidgetId`, `Widget`, `Container`, `Placement`)
//! - The per-room `RoomLayout` model with derived accessors

mod room_layout;
mod types;

pub use room_layout::{PinnedIds, RoomLayout};
pub use types::{Container, Placement, RoomId, SessionStatus, Widget, WidgetId};
