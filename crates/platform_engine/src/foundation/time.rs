//! Time management utilities

use std::time::{Duration, Instant};

use crate::core::config::TimingConfig;

/// Global game-speed modifier
///
/// Slow motion and acceleration are mutually exclusive: enabling one turns
/// the other off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeScale {
    /// Real time
    #[default]
    Normal,
    /// Half speed (by default)
    SlowMotion,
    /// One and a half speed (by default)
    Accelerated,
}

/// Fixed-rate frame clock
///
/// Stalls until the target frame duration has elapsed, measures the real
/// delta, clamps it to `max_delta` and then applies the time scale. The scale
/// is applied after the clamp, so an accelerated frame may exceed the
/// ceiling.
#[derive(Debug)]
pub struct FrameClock {
    frame_duration: Duration,
    max_delta: f32,
    slow_motion_factor: f32,
    accelerated_factor: f32,
    time_scale: TimeScale,
    last_tick: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl FrameClock {
    /// Create a clock from timing configuration
    pub fn new(timing: &TimingConfig) -> Self {
        let fps = timing.target_fps.max(1);
        Self {
            frame_duration: Duration::from_secs_f64(1.0 / f64::from(fps)),
            max_delta: timing.max_delta,
            slow_motion_factor: timing.slow_motion_scale,
            accelerated_factor: timing.accelerated_scale,
            time_scale: TimeScale::Normal,
            last_tick: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Block until the next frame is due and return its scaled delta
    pub fn wait_for_next_frame(&mut self) -> f32 {
        let due = self.last_tick + self.frame_duration;
        let now = Instant::now();
        if now < due {
            std::thread::sleep(due - now);
        }

        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.advance(elapsed)
    }

    /// Turn a measured wall-clock interval into this frame's delta
    pub fn advance(&mut self, elapsed: Duration) -> f32 {
        let clamped = elapsed.as_secs_f32().min(self.max_delta);
        let delta = clamped * self.scale_factor();

        self.delta_time = delta;
        self.total_time += delta;
        self.frame_count += 1;
        delta
    }

    /// Current multiplier for the active time scale
    pub fn scale_factor(&self) -> f32 {
        match self.time_scale {
            TimeScale::Normal => 1.0,
            TimeScale::SlowMotion => self.slow_motion_factor,
            TimeScale::Accelerated => self.accelerated_factor,
        }
    }

    /// Toggle slow motion, cancelling acceleration
    pub fn toggle_slow_motion(&mut self) {
        self.time_scale = if self.time_scale == TimeScale::SlowMotion {
            TimeScale::Normal
        } else {
            TimeScale::SlowMotion
        };
        log::debug!("Time scale set to {:?}", self.time_scale);
    }

    /// Toggle acceleration, cancelling slow motion
    pub fn toggle_acceleration(&mut self) {
        self.time_scale = if self.time_scale == TimeScale::Accelerated {
            TimeScale::Normal
        } else {
            TimeScale::Accelerated
        };
        log::debug!("Time scale set to {:?}", self.time_scale);
    }

    /// Active time scale
    pub fn time_scale(&self) -> TimeScale {
        self.time_scale
    }

    /// Delta of the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Total scaled time since the clock was created
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of frames produced so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Target duration of one frame
    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Instant,
}

impl Stopwatch {
    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }
}
