//! Audio output
//!
//! The engine only issues commands by handle; mixing and decoding belong to
//! the [`AudioSink`] implementation. Every call accepts
//! [`SoundHandle::INVALID`] and ignores it.

pub mod backend;

pub use backend::{NullAudio, PlaybackState};

/// Handle to a playing or paused sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(u32);

impl SoundHandle {
    /// Handle that refers to no sound
    pub const INVALID: Self = Self(0);

    /// Whether this handle could refer to a sound
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    pub(crate) fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl Default for SoundHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Audio submission backend
pub trait AudioSink {
    /// Preload a sound so the first `play` does not stall
    fn cache(&mut self, name: &str);

    /// Start a sound; [`SoundHandle::INVALID`] if it cannot be played
    fn play(&mut self, name: &str, looping: bool) -> SoundHandle;

    /// Pause a playing sound
    fn pause(&mut self, handle: SoundHandle);

    /// Resume a paused sound
    fn resume(&mut self, handle: SoundHandle);

    /// Stop a sound and release its handle
    fn stop(&mut self, handle: SoundHandle);

    /// Stop everything
    fn stop_all(&mut self);

    /// Advance the backend (reap finished sounds, etc.)
    fn update(&mut self, delta_time: f32);

    /// State of a sound, `None` for invalid or finished handles
    fn state(&self, handle: SoundHandle) -> Option<PlaybackState>;
}
