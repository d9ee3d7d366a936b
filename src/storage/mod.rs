//! Storage layer for prepmap progress.
//!
//! Progress is a single JSON object mapping node id to status, stored under
//! one well-known key (`roadmapProgress`) in a key-value backend.
//!
//! ## Storage Backends
//!
//! - **File backend** (default): `~/.local/share/prepmap/roadmapProgress.json`,
//!   or `$PREPMAP_DATA_DIR/roadmapProgress.json` when the variable is set
//! - **Memory backend**: for tests and embedding
//!
//! Reads fail soft: a missing, unreadable, or corrupt blob loads as an empty
//! mapping. Writes are a read-modify-write of the stored JSON object that replaces
//! one key and leaves every other entry as it was.

pub mod backend;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};

use crate::models::{NodeStatus, ProgressMap};
use crate::{Error, Result};
use std::path::PathBuf;

type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Storage key holding the serialized progress mapping.
pub const PROGRESS_KEY: &str = "roadmapProgress";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PREPMAP_DATA_DIR";

/// Persistence of per-node status.
pub trait ProgressStore {
    /// Load the full mapping. Never fails: bad or missing data loads as empty.
    fn load(&self) -> ProgressMap;

    /// Merge one node's status into the stored mapping and write it back.
    fn set_status(&mut self, node_id: &str, status: NodeStatus) -> Result<()>;

    /// Remove all stored progress.
    fn clear(&mut self) -> Result<()>;
}

/// Progress store over any key-value backend.
#[derive(Debug, Clone)]
pub struct Storage<B: StorageBackend = FileBackend> {
    backend: B,
}

impl Storage<FileBackend> {
    /// Open the file-backed store in the default data directory.
    pub fn open() -> Result<Self> {
        Ok(Self::new(FileBackend::new(get_data_dir()?)))
    }
}

impl Storage<MemoryBackend> {
    /// A store that lives only in memory.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }
}

impl<B: StorageBackend> Storage<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Storage location description (for display purposes).
    pub fn location(&self) -> String {
        self.backend.location()
    }

    fn read_raw(&self) -> Option<String> {
        match self.backend.read(PROGRESS_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(location = %self.backend.location(), "failed to read progress: {}", e);
                None
            }
        }
    }
}

impl<B: StorageBackend> ProgressStore for Storage<B> {
    fn load(&self) -> ProgressMap {
        self.read_raw()
            .map(|raw| parse_progress(&raw))
            .unwrap_or_default()
    }

    fn set_status(&mut self, node_id: &str, status: NodeStatus) -> Result<()> {
        // Entries this build does not understand are written back untouched
        let mut object = self
            .read_raw()
            .and_then(|raw| serde_json::from_str::<JsonObject>(&raw).ok())
            .unwrap_or_default();
        object.insert(node_id.to_string(), serde_json::to_value(status)?);
        let json = serde_json::to_string(&object)?;
        self.backend.write(PROGRESS_KEY, &json)
    }

    fn clear(&mut self) -> Result<()> {
        self.backend.remove(PROGRESS_KEY)
    }
}

impl<T: ProgressStore + ?Sized> ProgressStore for &mut T {
    fn load(&self) -> ProgressMap {
        (**self).load()
    }

    fn set_status(&mut self, node_id: &str, status: NodeStatus) -> Result<()> {
        (**self).set_status(node_id, status)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}

/// Parse a stored progress blob.
///
/// A blob that is not a JSON object yields an empty mapping. Entries whose
/// value is not a known status are dropped individually.
pub fn parse_progress(raw: &str) -> ProgressMap {
    let object: JsonObject = match serde_json::from_str(raw) {
        Ok(object) => object,
        Err(e) => {
            tracing::debug!("stored progress is malformed, treating as empty: {}", e);
            return ProgressMap::new();
        }
    };

    object
        .into_iter()
        .filter_map(|(id, value)| {
            match serde_json::from_value::<NodeStatus>(value.clone()) {
                Ok(status) => Some((id, status)),
                Err(_) => {
                    tracing::warn!(node = %id, value = %value, "dropping stored progress entry with unknown status");
                    None
                }
            }
        })
        .collect()
}

/// Get the data directory holding stored progress.
///
/// `$PREPMAP_DATA_DIR` wins; otherwise `<platform data dir>/prepmap`.
pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("prepmap"))
}
