//! Hitstop timer
//!
//! A hitstop freezes the entity update pass for a short time after an
//! impact. Only the entity pass stops; audio, camera and scene timers keep
//! running.

/// Global brief-freeze timer
#[derive(Debug, Clone, PartialEq)]
pub struct Hitstop {
    duration: f32,
    timer: f32,
    active: bool,
}

impl Hitstop {
    /// Create an inactive hitstop lasting `duration` seconds when triggered
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            timer: 0.0,
            active: false,
        }
    }

    /// Start (or restart) the freeze
    pub fn trigger(&mut self) {
        self.active = true;
        self.timer = 0.0;
        log::trace!("Hitstop triggered for {:.3}s", self.duration);
    }

    /// Advance the freeze; it ends on the first tick after the duration
    pub fn advance(&mut self, delta_time: f32) {
        if !self.active {
            return;
        }
        if self.timer < self.duration {
            self.timer += delta_time;
        } else {
            self.active = false;
        }
    }

    /// Whether entity updates are frozen
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Freeze length in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }
}
