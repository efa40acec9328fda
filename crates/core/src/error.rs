use board_engine::EngineError;
use board_store::StoreError;

/// Something the user has to be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("Permission to record audio was not granted")]
    PermissionDenied,

    #[error("A recording is already in progress")]
    AlreadyRecording,

    #[error("No recording in progress")]
    NotRecording,

    #[error("No clip at index {0}")]
    NoSuchClip(usize),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to load recordings: {0}")]
    Load(#[source] StoreError),

    #[error("Failed to save recording: {0}")]
    Save(#[source] StoreError),
}

impl BoardError {
    /// Storage and permission problems are shown to the user; everything else
    /// only goes to the log.
    pub fn alert(&self) -> Option<Alert> {
        match self {
            BoardError::PermissionDenied => {
                Some(Alert::new("Permission not granted", "Failed to record audio."))
            }
            BoardError::Load(_) | BoardError::Save(_) => Some(Alert::new("Error", self.to_string())),
            _ => None,
        }
    }
}
