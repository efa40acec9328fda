//! Audio side of the sound board: playing clips and capturing recordings.
//!
//! [`AudioBackend`] is the seam the session controller talks to. [`CpalBackend`]
//! implements it on top of cpal, with a lock-free [`Mixer`] for playback and a
//! [`Capture`] for recording to WAV.

mod backend;
mod capture;
mod error;
mod mixer;

use board_clip::{AudioArc, ClipSource, FileUri};

pub use backend::{BackendConfig, CpalBackend};
pub use capture::{Capture, write_wav};
pub use error::EngineError;
pub use mixer::{MAX_VOICES, Mixer, Status};

/// Outcome of asking for microphone access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

impl Permission {
    pub fn is_granted(self) -> bool {
        matches!(self, Permission::Granted)
    }
}

/// Platform audio capabilities needed by the sound board.
///
/// Calls are made one at a time from the UI thread. `Recording` is the live
/// capture handle; `stop_capture` consumes it whether or not it succeeds.
pub trait AudioBackend {
    type Recording;

    fn request_permission(&mut self) -> Permission;

    /// Must follow a granted permission and precede `start_capture`.
    fn configure_for_recording(&mut self) -> Result<(), EngineError>;

    fn start_capture(&mut self) -> Result<Self::Recording, EngineError>;

    fn stop_capture(&mut self, recording: Self::Recording) -> Result<FileUri, EngineError>;

    /// Decode a clip into a fresh sound.
    fn load(&mut self, source: &ClipSource) -> Result<AudioArc, EngineError>;

    /// Play a sound once as a new, independent voice.
    fn play(&mut self, sound: &AudioArc) -> Result<(), EngineError>;

    /// Housekeeping between frames, e.g. reclaiming finished voices.
    fn maintain(&mut self) {}
}
