//! # Engine Configuration
//!
//! Serializable configuration for the frame scheduler, scene transitions and
//! the logical view. Every section has defaults, so a config file only needs
//! the values it changes.
//!
//! ```toml
//! log_level = "debug"
//!
//! [timing]
//! target_fps = 60
//! max_delta = 0.05
//!
//! [transitions]
//! fade_window = 0.5
//! ```

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};

/// # Timing Configuration
///
/// Frame pacing, delta clamping, time-scale factors and hitstop length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Frames per second the scheduler stalls for
    pub target_fps: u32,
    /// Ceiling for a single frame's delta in seconds
    pub max_delta: f32,
    /// Multiplier used while slow motion is on
    pub slow_motion_scale: f32,
    /// Multiplier used while acceleration is on
    pub accelerated_scale: f32,
    /// How long a hitstop freezes entity updates, in seconds
    pub hitstop_duration: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            max_delta: 0.05,
            slow_motion_scale: 0.5,
            accelerated_scale: 1.5,
            hitstop_duration: 0.15,
        }
    }
}

/// # Transition Configuration
///
/// Durations for the scene transition state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Length of the opacity ramp at both ends of a transition
    pub fade_window: f32,
    /// Time the screen stays fully black around the scene swap
    pub active_hold: f32,
    /// Fade duration used for the first scene of a session
    pub initial_fade: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            fade_window: 0.5,
            active_hold: 0.5,
            initial_fade: 0.5,
        }
    }
}

/// # View Configuration
///
/// Logical screen size and camera tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Logical screen width in pixels
    pub logical_width: f32,
    /// Logical screen height in pixels
    pub logical_height: f32,
    /// Factor applied to level coordinates (tile size / authored tile size)
    pub world_scale: f32,
    /// Camera follow rate; higher catches up faster
    pub camera_follow_speed: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            logical_width: 1280.0,
            logical_height: 720.0,
            world_scale: 1.0,
            camera_follow_speed: 8.0,
        }
    }
}

/// # Engine Configuration
///
/// Core engine behavior: logging, frame limits and the subsystem sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter (overridden by `RUST_LOG`)
    pub log_level: String,
    /// Stop after this many frames; `None` runs until quit
    pub max_frames: Option<u64>,
    /// Frame pacing
    pub timing: TimingConfig,
    /// Scene transitions
    pub transitions: TransitionConfig,
    /// Logical view
    pub view: ViewConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            max_frames: None,
            timing: TimingConfig::default(),
            transitions: TransitionConfig::default(),
            view: ViewConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Stop the main loop after `frames` frames
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timing = &self.timing;
        if timing.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be at least 1".to_string()));
        }
        if timing.max_delta <= 0.0 {
            return Err(ConfigError::Invalid("max_delta must be positive".to_string()));
        }
        if timing.slow_motion_scale <= 0.0 || timing.accelerated_scale <= 0.0 {
            return Err(ConfigError::Invalid("time scales must be positive".to_string()));
        }
        if timing.hitstop_duration < 0.0 {
            return Err(ConfigError::Invalid("hitstop_duration cannot be negative".to_string()));
        }

        let transitions = &self.transitions;
        if transitions.fade_window <= 0.0 {
            return Err(ConfigError::Invalid("fade_window must be positive".to_string()));
        }
        if transitions.active_hold < 0.0 || transitions.initial_fade < 0.0 {
            return Err(ConfigError::Invalid("transition durations cannot be negative".to_string()));
        }

        if self.view.logical_width <= 0.0 || self.view.logical_height <= 0.0 {
            return Err(ConfigError::Invalid("logical view size must be positive".to_string()));
        }
        Ok(())
    }
}

impl Config for EngineConfig {}
