//! # Jingle
//!
//! The looping birthday melody. `Jingle` owns the `playing` flag and a small
//! scheduler of its own: one task per note plus a `Replay` task that fires
//! after the melody and a pause. `Replay` checks `playing` before queueing
//! the next pass, so the loop ends on the first check after `stop()`.
//!
//! How a note becomes sound is up to the `ToneSink`.

use std::fmt;

use log::{debug, warn};

use crate::core::navigation::DEFAULT_VOLUME;
use crate::core::scheduler::Scheduler;

/// Silence between passes of the melody.
pub const LOOP_PAUSE_MS: u64 = 2_000;
/// Output gain at full volume.
pub const MAX_GAIN: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub name: &'static str,
    pub freq_hz: f32,
    pub duration_ms: u64,
}

const fn note(name: &'static str, freq_hz: f32, duration_ms: u64) -> Note {
    Note {
        name,
        freq_hz,
        duration_ms,
    }
}

pub const MELODY: [Note; 12] = [
    note("C4", 261.63, 400),
    note("C4", 261.63, 400),
    note("D4", 293.66, 400),
    note("C4", 261.63, 400),
    note("F4", 349.23, 400),
    note("E4", 329.63, 800),
    note("C4", 261.63, 400),
    note("C4", 261.63, 400),
    note("D4", 293.66, 400),
    note("C4", 261.63, 400),
    note("G4", 392.00, 400),
    note("F4", 349.23, 800),
];

pub fn melody_length_ms() -> u64 {
    MELODY.iter().map(|n| n.duration_ms).sum()
}

#[derive(Debug)]
pub enum AudioError {
    /// Audio switched off by configuration.
    Disabled,
    /// The output device could not be opened or stopped working.
    Unavailable(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Disabled => write!(f, "audio disabled"),
            AudioError::Unavailable(msg) => write!(f, "audio unavailable: {msg}"),
        }
    }
}

impl std::error::Error for AudioError {}

pub trait ToneSink {
    /// Acquire the output. Called before the first note; a failure leaves
    /// the jingle stopped.
    fn open(&mut self) -> Result<(), AudioError>;

    fn play(&mut self, note: &Note, gain: f32) -> Result<(), AudioError>;

    fn silence(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JingleTask {
    Note(usize),
    Replay,
}

pub struct Jingle<S> {
    sink: S,
    opened: bool,
    playing: bool,
    volume: f32,
    scheduler: Scheduler<JingleTask>,
}

impl<S: ToneSink> Jingle<S> {
    pub fn new(sink: S, volume: f32) -> Self {
        Self {
            sink,
            opened: false,
            playing: false,
            volume: if volume.is_finite() {
                volume.clamp(0.0, 1.0)
            } else {
                DEFAULT_VOLUME
            },
            scheduler: Scheduler::new(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Non-finite values are ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn gain(&self) -> f32 {
        self.volume * MAX_GAIN
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Start or stop. Returns the new `playing` state.
    pub fn toggle(&mut self) -> bool {
        if self.playing {
            self.stop();
        } else {
            self.start();
        }
        self.playing
    }

    pub fn start(&mut self) {
        if self.playing {
            return;
        }
        if !self.opened {
            if let Err(e) = self.sink.open() {
                warn!("Audio context creation failed: {}", e);
                self.playing = false;
                return;
            }
            self.opened = true;
        }
        self.playing = true;
        self.queue_melody();
    }

    pub fn stop(&mut self) {
        self.playing = false;
        let dropped = self.scheduler.cancel_all();
        self.sink.silence();
        debug!("Jingle stopped, {} pending notes dropped", dropped);
    }

    /// Play every note due at `now_ms`.
    pub fn advance(&mut self, now_ms: u64) {
        while let Some((_, task)) = self.scheduler.pop_due(now_ms) {
            match task {
                JingleTask::Note(index) => {
                    let gain = self.gain();
                    if let Err(e) = self.sink.play(&MELODY[index], gain) {
                        warn!("Audio playback failed: {}", e);
                        self.stop();
                        break;
                    }
                }
                JingleTask::Replay => {
                    if self.playing {
                        self.queue_melody();
                    }
                }
            }
        }
    }

    fn queue_melody(&mut self) {
        let mut offset = 0;
        for (index, note) in MELODY.iter().enumerate() {
            self.scheduler.after(offset, JingleTask::Note(index));
            offset += note.duration_ms;
        }
        self.scheduler.after(offset + LOOP_PAUSE_MS, JingleTask::Replay);
    }
}
