use basedrop::{Collector, Handle, Shared};
use board_clip::AudioArc;
use cpal::{
    FromSample, SizedSample,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};

use crate::EngineError;

/// Voices sounding at once. Plays beyond this are dropped.
pub const MAX_VOICES: usize = 32;

/// Reported by the audio thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Finished(u64),
    Dropped(u64),
}

pub(crate) enum Command {
    Play(Voice),
}

/// One playing instance of a sound.
pub(crate) struct Voice {
    id: u64,
    // Dropped on the audio thread; basedrop defers the free to `Collector::collect`
    audio: Shared<AudioArc>,
    position: usize, // frames
}

impl Voice {
    fn sample(&self, output_channel: usize) -> f32 {
        let channels = self.audio.channels() as usize;
        if self.position >= self.audio.frames() {
            return 0.0;
        }
        self.audio.samples()[self.position * channels + output_channel % channels]
    }

    fn is_finished(&self) -> bool {
        self.position >= self.audio.frames()
    }
}

/// Audio-thread side of the mixer. Never allocates after construction.
pub(crate) struct MixerState {
    voices: Vec<Voice>,
}

impl MixerState {
    pub(crate) fn new() -> Self {
        Self {
            voices: Vec::with_capacity(MAX_VOICES),
        }
    }

    pub(crate) fn active(&self) -> usize {
        self.voices.len()
    }

    pub(crate) fn handle_command(&mut self, command: Command, status: &mut impl FnMut(Status)) {
        match command {
            Command::Play(voice) => {
                if self.voices.len() >= MAX_VOICES {
                    status(Status::Dropped(voice.id));
                    return;
                }
                self.voices.push(voice);
            }
        }
    }

    pub(crate) fn render<T>(
        &mut self,
        data: &mut [T],
        output_channels: usize,
        status: &mut impl FnMut(Status),
    ) where
        T: SizedSample + FromSample<f32>,
    {
        for frame in data.chunks_mut(output_channels) {
            for (ch, sample) in frame.iter_mut().enumerate() {
                let mixed: f32 = self.voices.iter().map(|voice| voice.sample(ch)).sum();
                *sample = T::from_sample(mixed.clamp(-1.0, 1.0));
            }
            for voice in &mut self.voices {
                voice.position += 1;
            }
        }

        let mut i = 0;
        while i < self.voices.len() {
            if self.voices[i].is_finished() {
                let voice = self.voices.swap_remove(i);
                status(Status::Finished(voice.id));
            } else {
                i += 1;
            }
        }
    }
}

/// UI-thread handle to the output stream.
///
/// Every [`Mixer::play`] starts a new voice, so several clips (or the same clip
/// twice) can sound at the same time.
pub struct Mixer {
    commands: rtrb::Producer<Command>,
    status: rtrb::Consumer<Status>,
    collector: Collector,
    handle: Handle,
    sample_rate: u32,
    next_voice: u64,
    active: usize,
    _stream: cpal::Stream,
}

impl Mixer {
    pub fn start() -> Result<Self, EngineError> {
        let collector = Collector::new();
        let handle = collector.handle();

        let (command_tx, command_rx) = rtrb::RingBuffer::<Command>::new(64);
        let (status_tx, status_rx) = rtrb::RingBuffer::<Status>::new(256);

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(EngineError::NoOutputDevice)?;

        let config = device
            .default_output_config()
            .map_err(EngineError::playback)?;
        let sample_rate = config.sample_rate().0;
        let stream_config = config.config();

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, command_rx, status_tx)?
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, command_rx, status_tx)?
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, command_rx, status_tx)?
            }
            sample_format => return Err(EngineError::UnsupportedFormat(sample_format)),
        };

        stream.play().map_err(EngineError::playback)?;

        log::info!(
            "Output stream started: {} Hz, {} channels",
            sample_rate,
            stream_config.channels
        );

        Ok(Self {
            commands: command_tx,
            status: status_rx,
            collector,
            handle,
            sample_rate,
            next_voice: 0,
            active: 0,
            _stream: stream,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Voices started and not yet reported finished.
    pub fn active_voices(&self) -> usize {
        self.active
    }

    /// Queue `sound` as a new voice and return its id.
    pub fn play(&mut self, sound: &AudioArc) -> Result<u64, EngineError> {
        let audio = sound
            .resample(self.sample_rate)
            .map_err(EngineError::playback)?;

        let id = self.next_voice;
        self.next_voice += 1;

        let voice = Voice {
            id,
            audio: Shared::new(&self.handle, audio),
            position: 0,
        };

        self.commands
            .push(Command::Play(voice))
            .map_err(|_| EngineError::playback(anyhow::anyhow!("mixer command queue is full")))?;
        self.active += 1;

        Ok(id)
    }

    /// Drain status reports and free audio of finished voices.
    pub fn maintain(&mut self) {
        while let Ok(status) = self.status.pop() {
            self.active = self.active.saturating_sub(1);
            match status {
                Status::Finished(id) => log::trace!("voice {id} finished"),
                Status::Dropped(id) => {
                    log::warn!("voice {id} dropped: {MAX_VOICES} voices already playing")
                }
            }
        }
        self.collector.collect();
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut command_rx: rtrb::Consumer<Command>,
    mut status_tx: rtrb::Producer<Status>,
) -> Result<cpal::Stream, EngineError>
where
    T: SizedSample + FromSample<f32>,
{
    let output_channels = config.channels as usize;
    let mut state = MixerState::new();

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let mut report = |status: Status| {
                    let _ = status_tx.push(status);
                };

                while let Ok(command) = command_rx.pop() {
                    state.handle_command(command, &mut report);
                }

                state.render(data, output_channels, &mut report);
            },
            |err| log::error!("Output stream error: {err}"),
            None,
        )
        .map_err(EngineError::playback)?;

    Ok(stream)
}
