//! Game actors
//!
//! Every entity of the game carries one [`Actor`] variant. The variant holds
//! the actor's own state; position, body, collider and drawable live on the
//! entity itself.

mod effects;
mod enemy;
mod ground;
mod menu;
mod player;
mod trigger;

pub use effects::{FireBall, Particle, ParticleEmitter};
pub use enemy::{strike, FlyingEnemy};
pub use ground::{Ground, GroundMotion};
pub use menu::{MainMenu, MenuOption};
pub use player::Player;
pub use trigger::{Trigger, TriggerAction};

use platform_engine::ecs::{Behavior, Category, Entity, EntityId, EntityRegistry, EntityState, Frame};
use platform_engine::foundation::math::Rect;

use crate::config::{EnemyTuning, GameConfig, PlayerTuning};
use crate::scenes::GameScene;

/// Fade used by in-game scene changes
pub const SCENE_FADE: f32 = 0.5;

/// Entity logic of the game
#[derive(Debug, Clone)]
pub enum Actor {
    /// The player character
    Player(Player),
    /// Solid or deadly level geometry
    Ground(Ground),
    /// Flying enemy
    FlyingEnemy(FlyingEnemy),
    /// Pooled player shot
    FireBall(FireBall),
    /// Pooled particle
    Particle(Particle),
    /// One-shot particle burst
    Emitter(ParticleEmitter),
    /// Level trigger or lever
    Trigger(Trigger),
    /// Title screen menu
    Menu(MainMenu),
    /// Decoration with no logic
    Scenery,
}

impl Behavior for Actor {
    type Scene = GameScene;
    type Shared = GameShared;

    fn update(&mut self, id: EntityId, frame: &mut Frame<'_, Self>, delta_time: f32) {
        match self {
            Self::Player(player) => player.update(id, frame, delta_time),
            Self::Ground(ground) => ground.update(id, frame, delta_time),
            Self::FlyingEnemy(enemy) => enemy.update(id, frame, delta_time),
            Self::FireBall(fireball) => fireball.update(id, frame, delta_time),
            Self::Particle(particle) => particle.update(id, frame, delta_time),
            Self::Emitter(emitter) => emitter.update(id, frame),
            Self::Trigger(trigger) => trigger.update(id, frame),
            Self::Menu(menu) => menu.update(frame),
            Self::Scenery => {}
        }
    }
}

/// State shared by all actors
#[derive(Debug, Clone)]
pub struct GameShared {
    /// The persistent player entity
    pub player: Option<EntityId>,
    /// Level the menu's "continue" enters
    pub continue_scene: GameScene,
    /// Level a new game starts in
    pub first_level: GameScene,
    /// Drop the player on the next level load
    pub fresh_start: bool,
    /// Level rectangle in world units
    pub level_bounds: Option<Rect>,
    /// Factor from authored level units to world units
    pub scale: f32,
    /// Player tuning, unscaled
    pub player_tuning: PlayerTuning,
    /// Enemy tuning, unscaled
    pub enemy_tuning: EnemyTuning,
    /// Enemies killed this session
    pub kills: u32,
}

impl GameShared {
    /// Shared state for a new session
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            player: None,
            continue_scene: config.continue_scene,
            first_level: GameScene::Forest,
            fresh_start: false,
            level_bounds: None,
            scale: config.engine.view.world_scale,
            player_tuning: config.player.clone(),
            enemy_tuning: config.enemy.clone(),
            kills: 0,
        }
    }
}

impl Default for GameShared {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

/// Move entity `id` by its rigid body
pub(crate) fn integrate(registry: &mut EntityRegistry<Actor>, id: EntityId, delta_time: f32) {
    if let Some(entity) = registry.get_mut(id) {
        let Entity { transform, body, .. } = entity;
        if let Some(body) = body.as_mut() {
            body.integrate(transform, delta_time);
        }
    }
}

/// First parked member of a pool category
pub(crate) fn acquire(registry: &EntityRegistry<Actor>, category: Category) -> Option<EntityId> {
    registry
        .category(category)
        .iter()
        .copied()
        .find(|&id| registry.get(id).is_some_and(|entity| entity.state == EntityState::Paused))
}

/// Take a pooled entity out of play
pub(crate) fn park(entity: &mut Entity<Actor>) {
    entity.state = EntityState::Paused;
    if let Some(drawable) = entity.drawable.as_mut() {
        drawable.set_visible(false);
    }
    if let Some(collider) = entity.collider.as_mut() {
        collider.active = false;
    }
    if let Some(body) = entity.body.as_mut() {
        body.stop();
    }
}

/// Put a pooled entity back into play
pub(crate) fn wake(entity: &mut Entity<Actor>) {
    entity.state = EntityState::Active;
    if let Some(drawable) = entity.drawable.as_mut() {
        drawable.set_visible(true);
    }
    if let Some(collider) = entity.collider.as_mut() {
        collider.active = true;
    }
}

/// Whether the boxes of `a` and `b` overlap
pub(crate) fn touching(registry: &EntityRegistry<Actor>, a: EntityId, b: EntityId) -> bool {
    let bounds = |id| registry.get(id).and_then(Entity::world_bounds);
    match (bounds(a), bounds(b)) {
        (Some(a), Some(b)) => a.intersects(&b),
        _ => false,
    }
}

#[cfg(test)]
pub(crate) mod harness {
    //! Runs update passes the way the engine does, without the engine

    use platform_engine::audio::NullAudio;
    use platform_engine::core::config::TransitionConfig;
    use platform_engine::ecs::{EntityRegistry, Frame, Hitstop, PassReport};
    use platform_engine::foundation::math::Vec2;
    use platform_engine::input::InputState;
    use platform_engine::render::Camera2D;
    use platform_engine::scene::SceneManager;

    use super::{Actor, GameShared};
    use crate::scenes::GameScene;
    use platform_engine::ecs::Behavior;

    pub(crate) struct World {
        pub registry: EntityRegistry<Actor>,
        pub camera: Camera2D,
        pub audio: NullAudio,
        pub hitstop: Hitstop,
        pub scenes: SceneManager<GameScene>,
        pub input: InputState,
        pub shared: GameShared,
    }

    impl World {
        pub fn new() -> Self {
            Self {
                registry: EntityRegistry::new(),
                camera: Camera2D::new(Vec2::new(1280.0, 720.0), 8.0).with_seed(1),
                audio: NullAudio::new(),
                hitstop: Hitstop::new(0.1),
                scenes: SceneManager::new(GameScene::Forest, &TransitionConfig::default())
                    .with_scenes(GameScene::ALL),
                input: InputState::new(),
                shared: GameShared::default(),
            }
        }

        pub fn pass(&mut self, delta_time: f32) -> PassReport {
            let Self {
                registry,
                camera,
                audio,
                hitstop,
                scenes,
                input,
                shared,
            } = self;

            let report = registry.run_update_pass(delta_time, |registry, id, behavior, dt| {
                let mut frame = Frame {
                    registry,
                    camera: &mut *camera,
                    audio: &mut *audio,
                    hitstop: &mut *hitstop,
                    scenes: &mut *scenes,
                    input: &*input,
                    shared: &mut *shared,
                };
                behavior.update(id, &mut frame, dt);
            });
            input.end_frame();
            report
        }
    }
}
