//! # Speaker
//!
//! Plays jingle notes on the default output device through cpal. The audio
//! callback runs on cpal's thread and shares one `Voice` with the session
//! behind a mutex; `play` restarts the voice, the callback renders it.
//!
//! Each note is a sine with a short linear attack and an exponential decay
//! towards silence, so consecutive notes don't click.

use std::f32::consts::TAU;
use std::fmt;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use log::{error, info};

use crate::core::music::{AudioError, Note, ToneSink};

/// Linear fade-in at the start of every note.
const ATTACK_S: f32 = 0.01;
/// Level the decay reaches just before the note ends.
const DECAY_FLOOR: f32 = 0.001;
const FALLBACK_SAMPLE_RATE: u32 = 44_100;

/// One sine voice. Pure sample math, no device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    sample_rate: f32,
    freq_hz: f32,
    gain: f32,
    phase: f32,
    elapsed: u64,
    length: u64,
}

impl Voice {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(1) as f32,
            freq_hz: 0.0,
            gain: 0.0,
            phase: 0.0,
            elapsed: 0,
            length: 0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate.max(1) as f32;
    }

    pub fn start(&mut self, freq_hz: f32, gain: f32, duration_ms: u64) {
        self.freq_hz = freq_hz;
        self.gain = gain.clamp(0.0, 1.0);
        self.phase = 0.0;
        self.elapsed = 0;
        self.length = (duration_ms as f32 / 1000.0 * self.sample_rate) as u64;
    }

    pub fn stop(&mut self) {
        self.elapsed = 0;
        self.length = 0;
    }

    pub fn is_sounding(&self) -> bool {
        self.elapsed < self.length
    }

    /// Amplitude at the current position in the note.
    fn level(&self) -> f32 {
        if self.gain <= 0.0 {
            return 0.0;
        }
        let t = self.elapsed as f32 / self.sample_rate;
        if t < ATTACK_S {
            return self.gain * t / ATTACK_S;
        }
        let floor = DECAY_FLOOR.min(self.gain);
        let decay_end = self.length as f32 / self.sample_rate - ATTACK_S;
        if decay_end <= ATTACK_S || t >= decay_end {
            return floor;
        }
        let progress = (t - ATTACK_S) / (decay_end - ATTACK_S);
        self.gain * (floor / self.gain).powf(progress)
    }

    pub fn next_sample(&mut self) -> f32 {
        if !self.is_sounding() {
            return 0.0;
        }
        let sample = (self.phase * TAU).sin() * self.level();
        self.phase = (self.phase + self.freq_hz / self.sample_rate).fract();
        self.elapsed += 1;
        sample
    }
}

/// `ToneSink` backed by the default cpal output device. The stream is
/// opened lazily on the first `open()` and kept until drop.
pub struct Speaker {
    voice: Arc<Mutex<Voice>>,
    stream: Option<Stream>,
}

impl fmt::Debug for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Speaker")
            .field("open", &self.stream.is_some())
            .finish()
    }
}

impl Default for Speaker {
    fn default() -> Self {
        Self::new()
    }
}

impl Speaker {
    pub fn new() -> Self {
        Self {
            voice: Arc::new(Mutex::new(Voice::new(FALLBACK_SAMPLE_RATE))),
            stream: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn build_stream(&self, device: &Device) -> Result<Stream, AudioError> {
        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::Unavailable(format!("no output config: {e}")))?;
        let sample_format = supported.sample_format();
        let config = supported.config();

        if let Ok(mut voice) = self.voice.lock() {
            voice.set_sample_rate(config.sample_rate.0);
        }
        let voice = Arc::clone(&self.voice);

        match sample_format {
            SampleFormat::F32 => build_stream::<f32>(device, &config, voice),
            SampleFormat::I16 => build_stream::<i16>(device, &config, voice),
            SampleFormat::U16 => build_stream::<u16>(device, &config, voice),
            sample_format => Err(AudioError::Unavailable(format!(
                "unsupported sample format: {sample_format:?}"
            ))),
        }
    }
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    voice: Arc<Mutex<Voice>>,
) -> Result<Stream, AudioError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = usize::from(config.channels.max(1));
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let Ok(mut voice) = voice.lock() else {
                    data.fill(T::EQUILIBRIUM);
                    return;
                };
                for frame in data.chunks_mut(channels) {
                    let sample = T::from_sample(voice.next_sample());
                    frame.fill(sample);
                }
            },
            move |err| error!("Audio stream error: {}", err),
            None,
        )
        .map_err(|e| AudioError::Unavailable(format!("failed to build stream: {e}")))
}

impl ToneSink for Speaker {
    fn open(&mut self) -> Result<(), AudioError> {
        if self.stream.is_some() {
            return Ok(());
        }
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| AudioError::Unavailable("no default output device".to_string()))?;
        let stream = self.build_stream(&device)?;
        stream
            .play()
            .map_err(|e| AudioError::Unavailable(format!("failed to start stream: {e}")))?;

        let name = device.name().unwrap_or_else(|_| "unknown".to_string());
        info!("Audio output opened on {}", name);
        self.stream = Some(stream);
        Ok(())
    }

    fn play(&mut self, note: &Note, gain: f32) -> Result<(), AudioError> {
        if self.stream.is_none() {
            return Err(AudioError::Unavailable("output not open".to_string()));
        }
        let mut voice = self
            .voice
            .lock()
            .map_err(|_| AudioError::Unavailable("audio thread panicked".to_string()))?;
        voice.start(note.freq_hz, gain, note.duration_ms);
        Ok(())
    }

    fn silence(&mut self) {
        if let Ok(mut voice) = self.voice.lock() {
            voice.stop();
        }
    }
}
