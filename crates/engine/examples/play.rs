//! Play an audio file through the mixer a few times, overlapping.
//!
//! cargo run -p board_engine --example play -- assets/sound1.wav

use std::path::PathBuf;
use std::time::Duration;

use board_clip::{BundledAsset, ClipSource};
use board_engine::{AudioBackend, BackendConfig, CpalBackend};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets/sound1.wav"));

    let mut backend = CpalBackend::new(BackendConfig {
        recordings_dir: std::env::temp_dir(),
        input_device: None,
        allow_microphone: false,
    });

    let source = ClipSource::Bundled(BundledAsset { id: 0, path });
    let sound = backend.load(&source)?;
    println!(
        "Loaded audio: {} frames, {} Hz, {} channels",
        sound.frames(),
        sound.sample_rate(),
        sound.channels()
    );

    for _ in 0..3 {
        backend.play(&sound)?;
        std::thread::sleep(Duration::from_millis(150));
        backend.maintain();
    }

    std::thread::sleep(Duration::from_secs_f64(sound.duration_secs() + 0.2));
    backend.maintain();
    Ok(())
}
