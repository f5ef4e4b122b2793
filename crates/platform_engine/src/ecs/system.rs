//! Behavior trait and the contexts behaviors run in
//!
//! Entity logic is a game-defined value (usually an enum with one variant per
//! actor kind) implementing [`Behavior`]. The engine lends every subsystem a
//! behavior may touch through [`Frame`] for the duration of one update call.

use crate::audio::AudioSink;
use crate::core::config::EngineConfig;
use crate::ecs::entity::{Entity, EntityId};
use crate::ecs::registry::EntityRegistry;
use crate::ecs::scheduler::Hitstop;
use crate::input::InputState;
use crate::render::camera::Camera2D;
use crate::render::Renderer;
use crate::scene::{SceneError, SceneKey, SceneManager};

/// Per-entity game logic
pub trait Behavior: Sized {
    /// Scene identifiers of the game
    type Scene: SceneKey;

    /// Game-wide state behaviors share (player id, pools, ...)
    type Shared;

    /// Update the entity `id` for one frame
    fn update(&mut self, id: EntityId, frame: &mut Frame<'_, Self>, delta_time: f32);
}

/// Everything a behavior can reach during the update pass
pub struct Frame<'a, B: Behavior> {
    /// The registry running the pass
    pub registry: &'a mut EntityRegistry<B>,
    /// Active camera
    pub camera: &'a mut Camera2D,
    /// Audio output
    pub audio: &'a mut dyn AudioSink,
    /// Global freeze timer
    pub hitstop: &'a mut Hitstop,
    /// Scene transition state machine
    pub scenes: &'a mut SceneManager<B::Scene>,
    /// Held keys
    pub input: &'a InputState,
    /// Game-wide state
    pub shared: &'a mut B::Shared,
}

impl<'a, B: Behavior> Frame<'a, B> {
    /// Look up an entity
    pub fn entity(&self, id: EntityId) -> Option<&Entity<B>> {
        self.registry.get(id)
    }

    /// Look up an entity mutably
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity<B>> {
        self.registry.get_mut(id)
    }

    /// Register a new entity; it is first updated on the next pass
    pub fn spawn(&mut self, entity: Entity<B>) -> EntityId {
        self.registry.add(entity)
    }

    /// Freeze entity updates briefly
    pub fn trigger_hitstop(&mut self) {
        self.hitstop.trigger();
    }

    /// Ask for a scene transition
    pub fn request_scene(&mut self, target: B::Scene, fade_duration: f32) -> Result<(), SceneError> {
        self.scenes.request_scene(target, fade_duration)
    }
}

/// Everything a game can reach while a scene is loaded or unloaded
pub struct SceneContext<'a, B: Behavior> {
    /// Entity registry
    pub registry: &'a mut EntityRegistry<B>,
    /// Active camera
    pub camera: &'a mut Camera2D,
    /// Audio output
    pub audio: &'a mut dyn AudioSink,
    /// Texture loading
    pub renderer: &'a mut dyn Renderer,
    /// Engine configuration
    pub config: &'a EngineConfig,
}
