//! Game trait and application events

use crate::assets::LevelError;
use crate::audio::AudioSink;
use crate::config::ConfigError;
use crate::ecs::{Behavior, SceneContext};
use crate::input::KeyCode;
use crate::render::Color;
use crate::scene::SceneError;
use thiserror::Error;

/// Scene identifier type of a game
pub type SceneOf<G> = <<G as Game>::Behavior as Behavior>::Scene;

/// Shared behavior state type of a game
pub type SharedOf<G> = <<G as Game>::Behavior as Behavior>::Shared;

/// Game lifecycle trait
///
/// Implement this trait to run a game on the engine. The game owns the state
/// its behaviors share and decides what each scene contains; the engine
/// decides when scenes change.
pub trait Game {
    /// Entity logic of the game
    type Behavior: Behavior;

    /// Scene loaded when the engine starts
    fn initial_scene(&self) -> SceneOf<Self>;

    /// Every scene that may be requested
    fn scenes(&self) -> Vec<SceneOf<Self>>;

    /// State lent to behaviors during the update pass
    fn shared_mut(&mut self) -> &mut SharedOf<Self>;

    /// Populate the registry for `scene`
    ///
    /// Called while the screen is fully covered. Entities spawned before an
    /// error stay registered.
    fn load_scene(
        &mut self,
        scene: SceneOf<Self>,
        ctx: &mut SceneContext<'_, Self::Behavior>,
    ) -> Result<(), GameError>;

    /// Remove the entities of `scene`
    fn unload_scene(&mut self, scene: SceneOf<Self>, ctx: &mut SceneContext<'_, Self::Behavior>);

    /// Whether the pause toggle works in `scene`
    fn can_pause(&self, _scene: SceneOf<Self>) -> bool {
        true
    }

    /// Called after the pause state flips
    fn on_pause_changed(&mut self, _paused: bool, _audio: &mut dyn AudioSink) {}

    /// Color the screen is cleared to
    fn clear_color(&self) -> Color {
        Color::BLACK
    }
}

/// Game-level errors
#[derive(Error, Debug)]
pub enum GameError {
    /// Level data could not be loaded
    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Scene request error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Custom game error
    #[error("Game error: {0}")]
    Custom(String),
}

/// Application events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Window close requested
    WindowCloseRequested,

    /// Window lost focus
    WindowUnfocused,

    /// Key was pressed
    KeyPressed(KeyCode),

    /// Key was released
    KeyReleased(KeyCode),
}
