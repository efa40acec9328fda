use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Handle to an audio file shipped with the application.
///
/// Resolved once at startup from the assets directory and kept for the
/// lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledAsset {
    pub id: usize,
    pub path: PathBuf,
}

/// `file://` URI of a recording on disk.
///
/// Stored verbatim in the persisted catalog. No percent-encoding is applied,
/// so paths round-trip as long as they come from this process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileUri(String);

const FILE_SCHEME: &str = "file://";

impl FileUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn from_path(path: &Path) -> Self {
        let path = path.to_string_lossy().replace('\\', "/");
        if path.starts_with('/') {
            Self(format!("{FILE_SCHEME}{path}"))
        } else {
            // Windows drive paths get the empty authority too: file:///C:/...
            Self(format!("{FILE_SCHEME}/{path}"))
        }
    }

    /// Filesystem path this URI points at. Bare paths without a scheme are
    /// accepted as-is.
    pub fn to_path(&self) -> PathBuf {
        let Some(rest) = self.0.strip_prefix(FILE_SCHEME) else {
            return PathBuf::from(&self.0);
        };

        let bytes = rest.as_bytes();
        if bytes.len() >= 3 && bytes[0] == b'/' && bytes[2] == b':' && bytes[1].is_ascii_alphabetic()
        {
            PathBuf::from(&rest[1..])
        } else {
            PathBuf::from(rest)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a clip's audio comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipSource {
    Bundled(BundledAsset),
    Recorded(FileUri),
}

impl ClipSource {
    pub fn path(&self) -> PathBuf {
        match self {
            ClipSource::Bundled(asset) => asset.path.clone(),
            ClipSource::Recorded(uri) => uri.to_path(),
        }
    }

    pub fn is_bundled(&self) -> bool {
        matches!(self, ClipSource::Bundled(_))
    }
}
