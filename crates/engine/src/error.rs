use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No audio input device available")]
    NoInputDevice,

    #[error("No audio output device available")]
    NoOutputDevice,

    #[error("Input device '{0}' not found")]
    InputDeviceNotFound(String),

    #[error("Unsupported sample format: {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("Failed to configure recording: {0}")]
    Config(anyhow::Error),

    #[error("Failed to start recording: {0}")]
    Start(anyhow::Error),

    #[error("Failed to stop recording: {0}")]
    Stop(anyhow::Error),

    #[error("Playback failed: {0}")]
    Playback(anyhow::Error),
}

impl EngineError {
    pub fn config(err: impl Into<anyhow::Error>) -> Self {
        EngineError::Config(err.into())
    }

    pub fn start(err: impl Into<anyhow::Error>) -> Self {
        EngineError::Start(err.into())
    }

    pub fn stop(err: impl Into<anyhow::Error>) -> Self {
        EngineError::Stop(err.into())
    }

    pub fn playback(err: impl Into<anyhow::Error>) -> Self {
        EngineError::Playback(err.into())
    }
}
