use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use board_clip::{AudioArc, ClipSource, FileUri};
use cpal::traits::{DeviceTrait, HostTrait};

use crate::{AudioBackend, Capture, EngineError, Mixer, Permission};

#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Where finished recordings are written.
    pub recordings_dir: PathBuf,
    /// Input device name; `None` uses the host default.
    pub input_device: Option<String>,
    /// When false, every permission request is denied.
    pub allow_microphone: bool,
}

/// [`AudioBackend`] on the default cpal host.
pub struct CpalBackend {
    config: BackendConfig,
    host: cpal::Host,
    input: Option<(cpal::Device, cpal::SupportedStreamConfig)>,
    mixer: Option<Mixer>,
}

impl CpalBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            host: cpal::default_host(),
            input: None,
            mixer: None,
        }
    }

    fn find_input_device(&self) -> Result<cpal::Device, EngineError> {
        let Some(wanted) = &self.config.input_device else {
            return self
                .host
                .default_input_device()
                .ok_or(EngineError::NoInputDevice);
        };

        let devices = self.host.input_devices().map_err(EngineError::config)?;
        for device in devices {
            if device.name().is_ok_and(|name| &name == wanted) {
                return Ok(device);
            }
        }
        Err(EngineError::InputDeviceNotFound(wanted.clone()))
    }

    fn mixer(&mut self) -> Result<&mut Mixer, EngineError> {
        if self.mixer.is_none() {
            self.mixer = Some(Mixer::start()?);
        }
        self.mixer.as_mut().ok_or(EngineError::NoOutputDevice)
    }

    fn next_recording_path(&self) -> PathBuf {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        self.config
            .recordings_dir
            .join(format!("recording-{millis}.wav"))
    }
}

impl AudioBackend for CpalBackend {
    type Recording = Capture;

    fn request_permission(&mut self) -> Permission {
        if !self.config.allow_microphone {
            log::info!("Microphone access disabled in configuration");
            return Permission::Denied;
        }

        match self.find_input_device() {
            Ok(_) => Permission::Granted,
            Err(e) => {
                log::warn!("Microphone unavailable: {e}");
                Permission::Denied
            }
        }
    }

    fn configure_for_recording(&mut self) -> Result<(), EngineError> {
        let device = self.find_input_device()?;
        let supported = device
            .default_input_config()
            .map_err(EngineError::config)?;

        log::debug!(
            "Recording from '{}' at {} Hz, {} channels",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            supported.sample_rate().0,
            supported.channels()
        );

        // Playback keeps working while recording; a missing output device must not block capture
        if let Err(e) = self.mixer() {
            log::warn!("Output unavailable while recording: {e}");
        }

        self.input = Some((device, supported));
        Ok(())
    }

    fn start_capture(&mut self) -> Result<Capture, EngineError> {
        let (device, supported) = self
            .input
            .as_ref()
            .ok_or_else(|| EngineError::start(anyhow::anyhow!("recording is not configured")))?;

        Capture::start(device, supported)
    }

    fn stop_capture(&mut self, recording: Capture) -> Result<FileUri, EngineError> {
        std::fs::create_dir_all(&self.config.recordings_dir).map_err(EngineError::stop)?;

        let path = self.next_recording_path();
        recording.finish(&path).map_err(EngineError::stop)?;

        let path = std::path::absolute(&path).map_err(EngineError::stop)?;
        log::info!("Recording saved to {}", path.display());
        Ok(FileUri::from_path(&path))
    }

    fn load(&mut self, source: &ClipSource) -> Result<AudioArc, EngineError> {
        let audio = board_decode::decode_source(source).map_err(EngineError::playback)?;

        // Cached at the output rate so repeated plays skip resampling
        let rate = self.mixer()?.sample_rate();
        audio.resample(rate).map_err(EngineError::playback)
    }

    fn play(&mut self, sound: &AudioArc) -> Result<(), EngineError> {
        let id = self.mixer()?.play(sound)?;
        log::debug!("Started voice {id}");
        Ok(())
    }

    fn maintain(&mut self) {
        if let Some(mixer) = &mut self.mixer {
            mixer.maintain();
        }
    }
}
