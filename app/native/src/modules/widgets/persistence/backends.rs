//! Persistence backends.
//!
//! - `MemoryPersistence` keeps layouts in a map (tests, embedding)
//! - `FilePersistence` stores one JSON file per room in a directory

use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use super::PersistenceError;
use super::bridge::LayoutPersistence;
use super::format::PersistedLayout;
use crate::modules::widgets::state::RoomId;

// ============================================================================
// Memory Backend
// ============================================================================

/// In-memory persistence backend.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    rooms: RwLock<HashMap<RoomId, serde_json::Value>>,
}

impl MemoryPersistence {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Raw stored value of a room.
    #[must_use]
    pub fn get(&self, room: &RoomId) -> Option<serde_json::Value> {
        self.rooms.read().get(room).cloned()
    }

    /// Store a raw value, as if another session had written it.
    pub fn set(&self, room: &RoomId, value: serde_json::Value) {
        self.rooms.write().insert(room.clone(), value);
    }
}

impl LayoutPersistence for MemoryPersistence {
    fn read(&self, room: &RoomId) -> Result<Option<serde_json::Value>, PersistenceError> {
        Ok(self.get(room))
    }

    fn write(&self, room: &RoomId, layout: &PersistedLayout) -> Result<(), PersistenceError> {
        self.set(room, layout.to_value());
        Ok(())
    }
}

// ============================================================================
// File Backend
// ============================================================================

/// File-based persistence backend.
///
/// Each room is stored as `<hex(room id)>.json`. Writes replace the file
/// atomically through a temporary file in the same directory.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    directory: PathBuf,
}

impl FilePersistence {
    /// Create a backend rooted at `directory`. The directory is created on first write.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Directory holding the layout files.
    #[must_use]
    pub fn directory(&self) -> &Path { &self.directory }

    /// Path of the file storing a room's layout.
    #[must_use]
    pub fn room_path(&self, room: &RoomId) -> PathBuf {
        let mut name = String::with_capacity(room.as_str().len() * 2 + 5);
        for byte in room.as_str().bytes() {
            let _ = write!(name, "{byte:02x}");
        }
        name.push_str(".json");
        self.directory.join(name)
    }
}

impl LayoutPersistence for FilePersistence {
    fn read(&self, room: &RoomId) -> Result<Option<serde_json::Value>, PersistenceError> {
        let path = self.room_path(room);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let value = serde_json::from_str(&content)?;
        Ok(Some(value))
    }

    fn write(&self, room: &RoomId, layout: &PersistedLayout) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.directory)?;

        let mut file = tempfile::NamedTempFile::new_in(&self.directory)?;
        serde_json::to_writer_pretty(&mut file, layout)?;
        file.write_all(b"\n")?;
        file.persist(self.room_path(room)).map_err(|err| PersistenceError::Io(err.error))?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
