//! # Scene Manager
//!
//! Timed state machine that drives scene changes. The manager does not own
//! any scene content: when the swap is due it hands the old and new scene to
//! a [`SceneLoader`], which unloads and loads the actual entities.
//!
//! ## Timing
//!
//! The timer counts down. When a phase ends the timer is set to the full
//! length of the next phase; left-over time is dropped. A transition takes at
//! least `fade_duration + active_hold + fade_window` seconds and at least
//! three frames.

use crate::core::config::TransitionConfig;

use super::transition::{fade_in_alpha, fade_out_alpha, TransitionPhase};
use super::{SceneError, SceneKey};

/// Performs the actual scene swap
pub trait SceneLoader<S: SceneKey> {
    /// Unload `from` and load `to`
    fn swap_scene(&mut self, from: S, to: S) -> Result<(), SceneError>;
}

impl<S, F> SceneLoader<S> for F
where
    S: SceneKey,
    F: FnMut(S, S) -> Result<(), SceneError>,
{
    fn swap_scene(&mut self, from: S, to: S) -> Result<(), SceneError> {
        self(from, to)
    }
}

/// Scene transition state machine
#[derive(Debug, Clone)]
pub struct SceneManager<S: SceneKey> {
    scenes: Vec<S>,
    current: S,
    next: Option<S>,
    phase: TransitionPhase,
    timer: f32,
    fade_alpha: u8,
    fade_window: f32,
    active_hold: f32,
}

impl<S: SceneKey> SceneManager<S> {
    /// Create an idle manager whose current scene is `initial`
    ///
    /// `initial` is registered; nothing is loaded until a request swaps it in.
    pub fn new(initial: S, config: &TransitionConfig) -> Self {
        Self {
            scenes: vec![initial],
            current: initial,
            next: None,
            phase: TransitionPhase::Idle,
            timer: 0.0,
            fade_alpha: 0,
            fade_window: config.fade_window.max(f32::EPSILON),
            active_hold: config.active_hold.max(0.0),
        }
    }

    /// Register additional scenes
    pub fn with_scenes(mut self, scenes: impl IntoIterator<Item = S>) -> Self {
        for scene in scenes {
            self.register_scene(scene);
        }
        self
    }

    /// Make `scene` a valid request target
    pub fn register_scene(&mut self, scene: S) {
        if !self.scenes.contains(&scene) {
            self.scenes.push(scene);
        }
    }

    /// Whether `scene` may be requested
    pub fn is_registered(&self, scene: S) -> bool {
        self.scenes.contains(&scene)
    }

    /// Start a transition to `target`
    ///
    /// Rejected without any state change while another transition runs or
    /// when `target` is not registered.
    pub fn request_scene(&mut self, target: S, fade_duration: f32) -> Result<(), SceneError> {
        if self.phase.is_transitioning() {
            log::warn!("Scene request {target:?} rejected: transition {:?} in progress", self.phase);
            return Err(SceneError::TransitionInProgress {
                requested: format!("{target:?}"),
                phase: self.phase,
            });
        }
        if !self.is_registered(target) {
            log::warn!("Scene request rejected: {target:?} is not registered");
            return Err(SceneError::UnknownScene(format!("{target:?}")));
        }

        log::info!("Transition {:?} -> {target:?} ({fade_duration:.2}s fade)", self.current);
        self.next = Some(target);
        self.timer = fade_duration;
        self.phase = TransitionPhase::Entering;
        Ok(())
    }

    /// Reload the current scene
    pub fn reset_scene(&mut self, fade_duration: f32) -> Result<(), SceneError> {
        self.request_scene(self.current, fade_duration)
    }

    /// Advance the state machine by one frame
    ///
    /// At most one phase change happens per call, so the covered frame of
    /// [`TransitionPhase::Active`] is always presented before the swap.
    pub fn update(&mut self, delta_time: f32, loader: &mut impl SceneLoader<S>) {
        match self.phase {
            TransitionPhase::Idle => {}
            TransitionPhase::Entering => {
                self.timer -= delta_time;
                if self.timer <= self.fade_window {
                    self.fade_alpha = fade_in_alpha(self.timer, self.fade_window);
                }
                if self.timer <= 0.0 {
                    self.timer = self.active_hold;
                    self.fade_alpha = 0;
                    self.phase = TransitionPhase::Active;
                    log::debug!("Screen covered, holding {:.2}s", self.active_hold);
                }
            }
            TransitionPhase::Active => {
                self.timer -= delta_time;
                if self.timer <= 0.0 {
                    self.swap(loader);
                    self.timer = self.fade_window;
                    self.fade_alpha = u8::MAX;
                    self.phase = TransitionPhase::Exiting;
                }
            }
            TransitionPhase::Exiting => {
                self.timer -= delta_time;
                self.fade_alpha = fade_out_alpha(self.timer, self.fade_window);
                if self.timer <= 0.0 {
                    self.timer = 0.0;
                    self.fade_alpha = 0;
                    self.next = None;
                    self.phase = TransitionPhase::Idle;
                    log::debug!("Transition to {:?} finished", self.current);
                }
            }
        }
    }

    fn swap(&mut self, loader: &mut impl SceneLoader<S>) {
        let Some(target) = self.next else {
            return;
        };

        if let Err(err) = loader.swap_scene(self.current, target) {
            // Partially loaded content stays; the transition still completes
            log::error!("Scene swap {:?} -> {target:?} failed: {err}", self.current);
        }
        self.current = target;
        log::info!("Scene {target:?} loaded");
    }

    /// Overlay opacity for the draw pass, `None` when nothing is drawn
    pub fn overlay(&self) -> Option<u8> {
        match self.phase {
            TransitionPhase::Idle => None,
            TransitionPhase::Entering | TransitionPhase::Exiting => Some(self.fade_alpha),
            TransitionPhase::Active => Some(u8::MAX),
        }
    }

    /// Current scene
    pub fn current(&self) -> S {
        self.current
    }

    /// Scene being transitioned to
    pub fn next(&self) -> Option<S> {
        self.next
    }

    /// Current phase
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Seconds left in the current phase
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Last computed fade opacity
    pub fn fade_alpha(&self) -> u8 {
        self.fade_alpha
    }

    /// Whether a transition is running
    pub fn is_transitioning(&self) -> bool {
        self.phase.is_transitioning()
    }

    /// Length of the opacity ramps
    pub fn fade_window(&self) -> f32 {
        self.fade_window
    }

    /// Length of the fully covered hold
    pub fn active_hold(&self) -> f32 {
        self.active_hold
    }
}
