mod audio;
mod source;

pub use audio::{AudioArc, resample_audio_arc};
pub use source::{BundledAsset, ClipSource, FileUri};

/// One playable entry of the sound board.
#[derive(Debug, Clone)]
pub struct ClipRef {
    /// Display label. Not required to be unique.
    pub name: String,
    pub source: ClipSource,
    /// Decoded sound attached at runtime. Never persisted.
    pub loaded: Option<AudioArc>,
    /// False while a recording exists only in memory because persisting it failed.
    pub synced: bool,
}

impl ClipRef {
    pub fn bundled(name: impl Into<String>, asset: BundledAsset) -> Self {
        Self {
            name: name.into(),
            source: ClipSource::Bundled(asset),
            loaded: None,
            synced: true,
        }
    }

    pub fn recorded(name: impl Into<String>, uri: FileUri) -> Self {
        Self {
            name: name.into(),
            source: ClipSource::Recorded(uri),
            loaded: None,
            synced: true,
        }
    }

    pub fn recorded_uri(&self) -> Option<&FileUri> {
        match &self.source {
            ClipSource::Recorded(uri) => Some(uri),
            ClipSource::Bundled(_) => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }
}
