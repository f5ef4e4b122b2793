//! Turns level data into entities
//!
//! Descriptors are spawned layer by layer in the order the loader returns
//! them. A descriptor that cannot be understood is logged and skipped; the
//! rest of the level still spawns.

use std::path::Path;

use platform_engine::assets::{LevelData, SpawnDescriptor};
use platform_engine::ecs::components::{Collider, Drawable, RigidBody};
use platform_engine::ecs::{Category, Entity, EntityId, EntityRegistry, EntityState};
use platform_engine::foundation::collections::Grid;
use platform_engine::foundation::math::{Rect, Vec2};
use platform_engine::render::{Color, Renderer, TextureId};

use crate::actors::{
    Actor, FireBall, FlyingEnemy, GameShared, Ground, GroundMotion, Particle, Player, Trigger, TriggerAction,
};
use crate::config::PoolConfig;
use crate::scenes::GameScene;

/// Tiles per row in the tile sheet
pub const TILESET_COLUMNS: i32 = 8;

const FIREBALL_SIZE: f32 = 20.0;
const PARTICLE_SIZE: f32 = 4.0;

/// Draw order of each kind of drawable
mod layer {
    pub const BACKGROUND: i32 = -100;
    pub const TILES: i32 = 0;
    pub const DYNAMIC_TILES: i32 = 1;
    pub const GROUNDS: i32 = 2;
    pub const ENEMIES: i32 = 5;
    pub const FIREBALLS: i32 = 8;
    pub const PLAYER: i32 = 10;
    pub const PARTICLES: i32 = 12;
}

/// Textures used while spawning a scene
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Textures {
    /// Player sprite
    pub player: Option<TextureId>,
    /// Flying enemy sprite
    pub enemy: Option<TextureId>,
    /// Fireball sprite
    pub fireball: Option<TextureId>,
    /// Level tile sheet
    pub tiles: Option<TextureId>,
    /// Scene background
    pub background: Option<TextureId>,
}

impl Textures {
    /// Load every texture `scene` needs; failures leave `None`
    pub fn load(renderer: &mut dyn Renderer, scene: GameScene) -> Self {
        let mut load = |path: &str| {
            let texture = renderer.load_texture(Path::new(path));
            if texture.is_none() {
                log::warn!("Texture {path} failed to load, its sprites will be skipped");
            }
            texture
        };
        Self {
            player: load("sprites/player.png"),
            enemy: load("sprites/flying_enemy.png"),
            fireball: load("sprites/fireball.png"),
            tiles: load("levels/tiles.png"),
            background: load(scene.background()),
        }
    }
}

/// What a level load produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnReport {
    /// Decorative tiles
    pub tiles: usize,
    /// Ground blocks
    pub grounds: usize,
    /// Triggers and levers
    pub triggers: usize,
    /// Enemies
    pub enemies: usize,
    /// Descriptors that were not understood
    pub skipped: usize,
    /// The player, if the level had a spawn point
    pub player: Option<EntityId>,
}

/// Spawns descriptors into a registry
pub struct LevelSpawner<'a> {
    registry: &'a mut EntityRegistry<Actor>,
    shared: &'a mut GameShared,
    textures: &'a Textures,
}

impl<'a> LevelSpawner<'a> {
    /// Spawn into `registry`
    pub fn new(registry: &'a mut EntityRegistry<Actor>, shared: &'a mut GameShared, textures: &'a Textures) -> Self {
        Self {
            registry,
            shared,
            textures,
        }
    }

    fn scale(&self) -> f32 {
        self.shared.scale
    }

    /// Create the parked fireball and particle pools
    pub fn spawn_pools(&mut self, pools: &PoolConfig) {
        let scale = self.scale();
        let tuning = self.shared.player_tuning.clone();
        let size = FIREBALL_SIZE * scale;

        for _ in 0..pools.fireballs {
            let fireball = FireBall::new(
                tuning.fireball_speed * scale,
                tuning.fireball_lifetime,
                tuning.fireball_damage,
            );
            self.add_parked(
                Entity::new(Actor::FireBall(fireball))
                    .with_size(size, size)
                    .with_body(RigidBody::new())
                    .with_collider(Collider::centered(size, size))
                    .with_drawable(Drawable::sprite(self.textures.fireball, layer::FIREBALLS))
                    .in_category(Category::FIREBALL),
            );
        }

        let size = PARTICLE_SIZE * scale;
        for _ in 0..pools.particles {
            self.add_parked(
                Entity::new(Actor::Particle(Particle::new()))
                    .with_size(size, size)
                    .with_body(RigidBody::new())
                    .with_drawable(Drawable::rect(Color::WHITE, layer::PARTICLES))
                    .in_category(Category::PARTICLE),
            );
        }
        log::debug!("Pools ready: {} fireballs, {} particles", pools.fireballs, pools.particles);
    }

    fn add_parked(&mut self, mut entity: Entity<Actor>) -> EntityId {
        crate::actors::park(&mut entity);
        self.registry.add(entity)
    }

    /// Spawn a level's tiles and objects
    pub fn spawn_level(&mut self, level: &LevelData) -> SpawnReport {
        let mut report = SpawnReport::default();
        let bounds = level.bounds();
        let scale = self.scale();

        self.spawn_background(Rect::new(
            bounds.x * scale,
            bounds.y * scale,
            bounds.w * scale,
            bounds.h * scale,
        ));
        report.tiles += self.spawn_tiles(&level.tiles, level.tile_size, layer::TILES);
        if let Some(dynamic) = &level.dynamic_tiles {
            report.tiles += self.spawn_tiles(dynamic, level.tile_size, layer::DYNAMIC_TILES);
        }

        for spawn in &level.spawns {
            let spawned = match spawn.layer.as_str() {
                "Grounds" => self.spawn_ground(spawn).map(|_| report.grounds += 1),
                "Triggers" => self.spawn_trigger(spawn, false).map(|_| report.triggers += 1),
                "Levers" => self.spawn_trigger(spawn, true).map(|_| report.triggers += 1),
                "Enemies" => self.spawn_enemy(spawn).map(|_| report.enemies += 1),
                "Player" => self.place_player(spawn).map(|id| report.player = Some(id)),
                _ => None,
            };
            if spawned.is_none() {
                log::warn!(
                    "Skipping {:?} (id {:?}) in layer {}",
                    spawn.kind,
                    spawn.level_id,
                    spawn.layer
                );
                report.skipped += 1;
            }
        }

        log::info!(
            "Level spawned: {} tiles, {} grounds, {} triggers, {} enemies, {} skipped",
            report.tiles,
            report.grounds,
            report.triggers,
            report.enemies,
            report.skipped
        );
        report
    }

    /// Full-screen backdrop centered on `area`
    pub fn spawn_background(&mut self, area: Rect) -> EntityId {
        self.registry.add(
            Entity::new(Actor::Scenery)
                .with_state(EntityState::Paused)
                .with_position(Vec2::new(area.x + area.w / 2.0, area.y + area.h / 2.0))
                .with_size(area.w, area.h)
                .with_drawable(Drawable::sprite(self.textures.background, layer::BACKGROUND)),
        )
    }

    #[allow(clippy::cast_precision_loss)]
    fn spawn_tiles(&mut self, grid: &Grid<i32>, tile_size: f32, draw_order: i32) -> usize {
        let world_size = tile_size * self.scale();
        let mut count = 0;

        for (row, col, &tile) in grid.iter() {
            if tile <= 0 {
                continue;
            }
            let index = tile - 1;
            let source = Rect::new(
                (index % TILESET_COLUMNS) as f32 * tile_size,
                (index / TILESET_COLUMNS) as f32 * tile_size,
                tile_size,
                tile_size,
            );
            let center = Vec2::new((col as f32 + 0.5) * world_size, (row as f32 + 0.5) * world_size);

            self.registry.add(
                Entity::new(Actor::Scenery)
                    .with_state(EntityState::Paused)
                    .with_position(center)
                    .with_size(world_size, world_size)
                    .with_drawable(Drawable::sprite(self.textures.tiles, draw_order).with_source(source)),
            );
            count += 1;
        }
        count
    }

    fn spawn_ground(&mut self, spawn: &SpawnDescriptor) -> Option<EntityId> {
        if spawn.kind != "Ground" && spawn.kind != "DynamicGround" {
            return None;
        }
        let scale = self.scale();
        let size = spawn.size * scale;
        if size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }

        let mut ground = if spawn.flag("Spike") {
            let respawn = spawn
                .number("RespawnPositionX")
                .zip(spawn.number("RespawnPositionY"))
                .map(|(x, y)| Vec2::new(x, y) * scale);
            Ground::spike(respawn)
        } else {
            Ground::solid()
        };
        if spawn.flag("Moving") {
            let velocity = Vec2::new(
                spawn.number("SpeedX").unwrap_or(0.0),
                spawn.number("SpeedY").unwrap_or(0.0),
            ) * scale;
            ground = ground.with_motion(GroundMotion::new(velocity, spawn.number("MovingDuration").unwrap_or(0.0)));
        }

        // Static blocks are drawn by the tile layers
        let drawable = ground
            .is_moving()
            .then(|| Drawable::rect(Color::rgb(92, 64, 51), layer::GROUNDS));
        let state = if ground.is_moving() { EntityState::Active } else { EntityState::Paused };

        let mut entity = Entity::new(Actor::Ground(ground))
            .with_state(state)
            .with_position(spawn.center() * scale)
            .with_size(size.x, size.y)
            .with_collider(Collider::centered(size.x, size.y))
            .in_category(Category::GROUND);
        if let Some(level_id) = spawn.level_id {
            entity = entity.with_level_id(level_id);
        }
        entity.drawable = drawable;
        Some(self.registry.add(entity))
    }

    fn spawn_trigger(&mut self, spawn: &SpawnDescriptor, lever: bool) -> Option<EntityId> {
        let scale = self.scale();
        let action = trigger_action(spawn, scale)?;
        let trigger = if lever { Trigger::lever(action) } else { Trigger::on_touch(action) };
        // Levers are point objects in the editor
        let size = if lever { Vec2::new(40.0, 40.0) * scale } else { spawn.size * scale };

        Some(
            self.registry.add(
                Entity::new(Actor::Trigger(trigger))
                    .with_position(spawn.center() * scale)
                    .with_size(size.x, size.y)
                    .with_collider(Collider::centered(size.x, size.y)),
            ),
        )
    }

    fn spawn_enemy(&mut self, spawn: &SpawnDescriptor) -> Option<EntityId> {
        if spawn.kind != "Flying Enemy" {
            return None;
        }
        let scale = self.scale();
        let tuning = &self.shared.enemy_tuning;
        let (width, height) = (tuning.width * scale, tuning.height * scale);
        let home = spawn.position * scale;

        let mut entity = Entity::new(Actor::FlyingEnemy(FlyingEnemy::new(tuning, scale, home)))
            .with_position(home)
            .with_size(width, height)
            .with_body(RigidBody::new())
            .with_collider(Collider::centered(width, height))
            .with_drawable(Drawable::sprite(self.textures.enemy, layer::ENEMIES))
            .in_category(Category::ENEMY);
        if let Some(level_id) = spawn.level_id {
            entity = entity.with_level_id(level_id);
        }
        Some(self.registry.add(entity))
    }

    /// Reuse the persistent player or create it, then drop it at the spawn
    fn place_player(&mut self, spawn: &SpawnDescriptor) -> Option<EntityId> {
        let position = spawn.position * self.scale();
        let id = match self.shared.player.filter(|&id| self.registry.contains(id)) {
            Some(id) => id,
            None => {
                let scale = self.scale();
                let tuning = &self.shared.player_tuning;
                let (width, height) = (tuning.width * scale, tuning.height * scale);
                let id = self.registry.add(
                    Entity::new(Actor::Player(Player::new(tuning, scale)))
                        .with_size(width, height)
                        .with_body(RigidBody::with_gravity(
                            tuning.gravity * scale,
                            tuning.max_fall_speed * scale,
                        ))
                        .with_collider(Collider::centered(width, height))
                        .with_drawable(Drawable::sprite(self.textures.player, layer::PLAYER)),
                );
                log::debug!("Created player entity");
                id
            }
        };

        self.shared.player = Some(id);
        Player::enter_level(self.registry, id, position).then_some(id)
    }
}

/// Decode the action of a trigger or lever descriptor
pub fn trigger_action(spawn: &SpawnDescriptor, scale: f32) -> Option<TriggerAction> {
    let target = spawn.text("Target").unwrap_or_default();
    let event = spawn.text("Event").unwrap_or_default();

    match target {
        "Scene" => {
            let name = spawn.text("Scene")?;
            match name.parse() {
                Ok(scene) => Some(TriggerAction::ChangeScene(scene)),
                Err(err) => {
                    log::warn!("Trigger {:?}: {err}", spawn.level_id);
                    None
                }
            }
        }
        "Camera" if matches!(event, "Free" | "Release") => Some(TriggerAction::ReleaseCamera),
        "Camera" => {
            let point = Vec2::new(
                spawn.number("FixedCameraPositionX").unwrap_or(0.0),
                spawn.number("FixedCameraPositionY").unwrap_or(0.0),
            );
            Some(TriggerAction::FixCamera(point * scale))
        }
        "Ground" | "DynamicGround" => {
            let ids = spawn.id_list("Grounds");
            (!ids.is_empty()).then_some(TriggerAction::UnlockGrounds(ids))
        }
        _ => None,
    }
}
