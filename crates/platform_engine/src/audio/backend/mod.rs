//! Audio backend implementations
//!
//! Only a silent backend ships with the engine. It keeps the full playback
//! state machine so games and tests behave the same as with real output.

use std::collections::{HashMap, HashSet};

use super::{AudioSink, SoundHandle};

/// Playback state of one sound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Audible
    Playing,
    /// Held; resumes where it stopped
    Paused,
    /// Finished; reaped on the next update
    Stopped,
}

#[derive(Debug, Clone)]
struct Voice {
    name: String,
    looping: bool,
    state: PlaybackState,
    remaining: f32,
}

/// Silent audio backend
///
/// One-shot sounds last `one_shot_length` seconds of playback; looping
/// sounds play until stopped.
#[derive(Debug)]
pub struct NullAudio {
    voices: HashMap<SoundHandle, Voice>,
    cached: HashSet<String>,
    next_handle: u32,
    one_shot_length: f32,
}

impl NullAudio {
    /// Create a backend with one-second one-shots
    pub fn new() -> Self {
        Self {
            voices: HashMap::new(),
            cached: HashSet::new(),
            next_handle: 1,
            one_shot_length: 1.0,
        }
    }

    /// Set how long one-shot sounds play
    pub fn with_one_shot_length(mut self, seconds: f32) -> Self {
        self.one_shot_length = seconds.max(0.0);
        self
    }

    /// Number of sounds not yet reaped
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Name of the sound behind `handle`
    pub fn sound_name(&self, handle: SoundHandle) -> Option<&str> {
        self.voices.get(&handle).map(|voice| voice.name.as_str())
    }

    /// Whether `name` was preloaded
    pub fn is_cached(&self, name: &str) -> bool {
        self.cached.contains(name)
    }

    fn set_state(&mut self, handle: SoundHandle, from: PlaybackState, to: PlaybackState) {
        if let Some(voice) = self.voices.get_mut(&handle) {
            if voice.state == from {
                voice.state = to;
            }
        }
    }
}

impl Default for NullAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for NullAudio {
    fn cache(&mut self, name: &str) {
        self.cached.insert(name.to_string());
    }

    fn play(&mut self, name: &str, looping: bool) -> SoundHandle {
        if name.is_empty() {
            log::warn!("Ignoring request to play an unnamed sound");
            return SoundHandle::INVALID;
        }

        let handle = SoundHandle::from_raw(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1).max(1);
        self.voices.insert(
            handle,
            Voice {
                name: name.to_string(),
                looping,
                state: PlaybackState::Playing,
                remaining: self.one_shot_length,
            },
        );
        log::trace!("Playing {name} (looping: {looping})");
        handle
    }

    fn pause(&mut self, handle: SoundHandle) {
        self.set_state(handle, PlaybackState::Playing, PlaybackState::Paused);
    }

    fn resume(&mut self, handle: SoundHandle) {
        self.set_state(handle, PlaybackState::Paused, PlaybackState::Playing);
    }

    fn stop(&mut self, handle: SoundHandle) {
        if let Some(voice) = self.voices.get_mut(&handle) {
            voice.state = PlaybackState::Stopped;
        }
    }

    fn stop_all(&mut self) {
        for voice in self.voices.values_mut() {
            voice.state = PlaybackState::Stopped;
        }
    }

    fn update(&mut self, delta_time: f32) {
        for voice in self.voices.values_mut() {
            if voice.state == PlaybackState::Playing && !voice.looping {
                voice.remaining -= delta_time;
                if voice.remaining <= 0.0 {
                    voice.state = PlaybackState::Stopped;
                }
            }
        }
        self.voices.retain(|_, voice| voice.state != PlaybackState::Stopped);
    }

    fn state(&self, handle: SoundHandle) -> Option<PlaybackState> {
        self.voices.get(&handle).map(|voice| voice.state)
    }
}
