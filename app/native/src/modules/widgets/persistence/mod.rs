//! Persistence bridge for room layouts.
//!
//! This module contains:
//! - The persisted JSON format (`PersistedLayout`, `PersistedEntry`)
//! - The `LayoutPersistence` backend trait and two backends
//! - The write-through `PersistenceBridge` and its `PersistenceWorker`

mod backends;
mod bridge;
mod format;

pub use backends::{FilePersistence, MemoryPersistence};
pub use bridge::{LayoutPersistence, PersistRequest, PersistenceBridge, PersistenceWorker};
pub use format::{PersistedEntry, PersistedLayout};

/// Errors raised by persistence backends.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Reading or writing the backing store failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored content could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Backend-specific failure.
    #[error("Backend error: {0}")]
    Backend(String),
}
