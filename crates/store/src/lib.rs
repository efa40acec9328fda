mod kv;
mod load;
mod save;

use board_clip::{ClipRef, FileUri};
use serde::{Deserialize, Serialize};

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use load::load_recordings;
pub use save::save_recordings;

/// Key the recordings list lives under.
pub const RECORDINGS_KEY: &str = "RECORDINGS";

/// Persisted form of a user recording. The decoded sound is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredClip {
    pub name: String,
    #[serde(alias = "source")]
    pub uri: FileUri,
}

impl StoredClip {
    /// `None` for bundled clips, which are never persisted.
    pub fn from_clip(clip: &ClipRef) -> Option<Self> {
        clip.recorded_uri().map(|uri| StoredClip {
            name: clip.name.clone(),
            uri: uri.clone(),
        })
    }

    pub fn into_clip(self) -> ClipRef {
        ClipRef::recorded(self.name, self.uri)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read '{key}': {source}")]
    Read {
        key: String,
        source: std::io::Error,
    },

    #[error("Failed to write '{key}': {source}")]
    Write {
        key: String,
        source: std::io::Error,
    },

    #[error("Stored recordings are malformed: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to encode recordings: {0}")]
    Encode(#[source] serde_json::Error),
}

/// The recordings list stored under [`RECORDINGS_KEY`] in a key-value store.
#[derive(Debug)]
pub struct RecordingStore<S> {
    kv: S,
}

impl<S: KeyValueStore> RecordingStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Absent key yields an empty list.
    pub fn load(&self) -> Result<Vec<StoredClip>, StoreError> {
        load_recordings(&self.kv)
    }

    /// Overwrites the whole list.
    pub fn save(&mut self, clips: &[StoredClip]) -> Result<(), StoreError> {
        save_recordings(&mut self.kv, clips)
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn kv_mut(&mut self) -> &mut S {
        &mut self.kv
    }
}
