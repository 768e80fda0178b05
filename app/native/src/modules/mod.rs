//! Feature modules for Roomdeck.
//!
//! - [`widgets`] - Per-room widget layout engine
//! - [`presence`] - User activity tracking (active / passive timers)

pub mod presence;
pub mod widgets;
