use board_core::BackendConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the bundled sounds.
    pub assets_dir: PathBuf,
    /// Where the recordings list is stored.
    pub data_dir: PathBuf,
    /// Defaults to `<data_dir>/recordings`.
    pub recordings_dir: Option<PathBuf>,
    pub input_device: Option<String>,
    pub allow_microphone: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            data_dir: dirs::data_dir()
                .map(|p| p.join("soundboard"))
                .unwrap_or_else(|| PathBuf::from(".soundboard")),
            recordings_dir: None,
            input_device: None,
            allow_microphone: true,
        }
    }
}

impl Config {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("soundboard").join("config.toml"))
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        };

        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring invalid config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn recordings_dir(&self) -> PathBuf {
        self.recordings_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("recordings"))
    }

    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            recordings_dir: self.recordings_dir(),
            input_device: self.input_device.clone(),
            allow_microphone: self.allow_microphone,
        }
    }
}
