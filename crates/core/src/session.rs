use board_clip::FileUri;
use board_engine::AudioBackend;

use crate::BoardError;

/// Whether a recording is in flight. The live capture handle only exists
/// inside `Recording`, so there can never be two.
#[derive(Debug)]
pub enum RecordingState<R> {
    Idle,
    Recording(R),
}

impl<R> RecordingState<R> {
    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording(_))
    }

    fn take(&mut self) -> Option<R> {
        match std::mem::replace(self, RecordingState::Idle) {
            RecordingState::Recording(handle) => Some(handle),
            RecordingState::Idle => None,
        }
    }
}

/// Sequences permission, configure, start and stop for a single recording.
#[derive(Debug)]
pub struct SessionController<R> {
    state: RecordingState<R>,
}

impl<R> Default for SessionController<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> SessionController<R> {
    pub fn new() -> Self {
        Self {
            state: RecordingState::Idle,
        }
    }

    pub fn state(&self) -> &RecordingState<R> {
        &self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state.is_recording()
    }

    pub fn can_start(&self) -> bool {
        !self.is_recording()
    }

    pub fn can_stop(&self) -> bool {
        self.is_recording()
    }

    /// Idle -> Recording. Any failure leaves the controller Idle.
    pub fn start<A>(&mut self, audio: &mut A) -> Result<(), BoardError>
    where
        A: AudioBackend<Recording = R>,
    {
        if self.is_recording() {
            return Err(BoardError::AlreadyRecording);
        }

        if !audio.request_permission().is_granted() {
            return Err(BoardError::PermissionDenied);
        }

        audio.configure_for_recording()?;
        let handle = audio.start_capture()?;

        self.state = RecordingState::Recording(handle);
        log::info!("Recording started");
        Ok(())
    }

    /// Recording -> Idle. The controller is Idle afterwards even if the
    /// backend fails to finalize the capture.
    pub fn stop<A>(&mut self, audio: &mut A) -> Result<FileUri, BoardError>
    where
        A: AudioBackend<Recording = R>,
    {
        let handle = self.state.take().ok_or(BoardError::NotRecording)?;
        let uri = audio.stop_capture(handle)?;
        log::info!("Recording stopped: {uri}");
        Ok(uri)
    }
}
