use std::path::Path;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{FromSample, SizedSample};

use crate::EngineError;

/// A recording in progress.
///
/// Samples arrive on cpal's input thread and are appended to a shared buffer;
/// [`Capture::finish`] stops the stream and writes everything out as WAV.
pub struct Capture {
    stream: cpal::Stream,
    samples: Arc<Mutex<Vec<f32>>>,
    sample_rate: u32,
    channels: u16,
}

impl Capture {
    pub fn start(
        device: &cpal::Device,
        config: &cpal::SupportedStreamConfig,
    ) -> Result<Self, EngineError> {
        let samples = Arc::new(Mutex::new(Vec::new()));
        let stream_config = config.config();

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_input_stream::<f32>(device, &stream_config, samples.clone())?
            }
            cpal::SampleFormat::I16 => {
                build_input_stream::<i16>(device, &stream_config, samples.clone())?
            }
            cpal::SampleFormat::I32 => {
                build_input_stream::<i32>(device, &stream_config, samples.clone())?
            }
            cpal::SampleFormat::U16 => {
                build_input_stream::<u16>(device, &stream_config, samples.clone())?
            }
            sample_format => return Err(EngineError::UnsupportedFormat(sample_format)),
        };

        stream.play().map_err(EngineError::start)?;

        Ok(Self {
            stream,
            samples,
            sample_rate: stream_config.sample_rate.0,
            channels: stream_config.channels,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Stop capturing and write the recording to `path`.
    pub fn finish(self, path: &Path) -> anyhow::Result<()> {
        // Pausing can fail on some hosts; dropping the stream stops it regardless
        if let Err(e) = self.stream.pause() {
            log::debug!("Input stream pause failed: {e}");
        }
        drop(self.stream);

        let samples = std::mem::take(
            &mut *self
                .samples
                .lock()
                .map_err(|_| anyhow::anyhow!("capture buffer lock poisoned"))?,
        );

        log::info!(
            "Captured {:.2}s of audio",
            samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
        );

        write_wav(&samples, self.sample_rate, self.channels, path)
    }
}

fn build_input_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    samples: Arc<Mutex<Vec<f32>>>,
) -> Result<cpal::Stream, EngineError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let stream = device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                if let Ok(mut buffer) = samples.lock() {
                    buffer.extend(data.iter().map(|&s| f32::from_sample_(s)));
                }
            },
            |err| log::warn!("Input stream error: {err}"),
            None,
        )
        .map_err(EngineError::start)?;

    Ok(stream)
}

/// Write interleaved float samples as a 32-bit float WAV file.
pub fn write_wav(samples: &[f32], sample_rate: u32, channels: u16, path: &Path) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;

    for &sample in samples {
        writer.write_sample(sample)?;
    }

    writer.finalize()?;
    Ok(())
}
