//! The player character
//!
//! The player entity outlives scenes: unloading a level parks it, the next
//! level moves it to the back of the update order and drops it at that
//! level's spawn point.

use std::f32::consts::PI;

use platform_engine::ecs::{Category, EntityId, EntityRegistry, EntityState, Frame};
use platform_engine::foundation::math::Vec2;
use platform_engine::input::KeyCode;
use platform_engine::physics;

use super::ground::first_spike;
use super::{acquire, integrate, Actor, FireBall, SCENE_FADE};
use crate::config::PlayerTuning;

/// Player state
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    move_speed: f32,
    jump_speed: f32,
    max_health: f32,
    health: f32,
    invulnerability: f32,
    hurt_timer: f32,
    fire_cooldown: f32,
    fire_timer: f32,
    on_ground: bool,
    spawn_point: Vec2,
}

impl Player {
    /// Player with the given tuning, scaled to world units
    pub fn new(tuning: &PlayerTuning, scale: f32) -> Self {
        Self {
            move_speed: tuning.move_speed * scale,
            jump_speed: tuning.jump_speed * scale,
            max_health: tuning.health,
            health: tuning.health,
            invulnerability: tuning.invulnerability,
            hurt_timer: tuning.invulnerability,
            fire_cooldown: tuning.fire_cooldown,
            fire_timer: tuning.fire_cooldown,
            on_ground: false,
            spawn_point: Vec2::zeros(),
        }
    }

    /// Remaining health
    pub fn health(&self) -> f32 {
        self.health
    }

    /// Whether the player stood on ground after the last update
    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    /// Where the player reappears after falling out or dying
    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_point
    }

    /// Put player `id` into play at `spawn`
    ///
    /// Moves it to the back of the update order so it reacts to everything
    /// else that moved this frame.
    pub fn enter_level(registry: &mut EntityRegistry<Actor>, id: EntityId, spawn: Vec2) -> bool {
        let Some(entity) = registry.get_mut(id) else {
            return false;
        };
        if let Some(Actor::Player(player)) = entity.behavior_mut() {
            player.spawn_point = spawn;
            player.health = player.max_health;
        }
        entity.state = EntityState::Active;
        entity.transform.position = spawn;
        if let Some(body) = entity.body.as_mut() {
            body.stop();
        }
        if let Some(collider) = entity.collider.as_mut() {
            collider.active = true;
        }
        if let Some(drawable) = entity.drawable.as_mut() {
            drawable.set_visible(true);
        }
        registry.move_to_back(id)
    }

    fn hurt(&mut self, damage: f32) -> bool {
        if self.hurt_timer < self.invulnerability {
            return false;
        }
        self.health -= damage;
        self.hurt_timer = 0.0;
        log::debug!("Player hurt, {} health left", self.health);
        true
    }

    fn respawn(&self, id: EntityId, registry: &mut EntityRegistry<Actor>, at: Vec2) {
        if let Some(entity) = registry.get_mut(id) {
            entity.transform.position = at;
            if let Some(body) = entity.body.as_mut() {
                body.stop();
            }
        }
    }

    pub(crate) fn update(&mut self, id: EntityId, frame: &mut Frame<'_, Actor>, delta_time: f32) {
        self.hurt_timer += delta_time;
        self.fire_timer += delta_time;

        let axis = frame.input.horizontal_axis();
        let jump = frame.input.just_pressed(KeyCode::Space) || frame.input.just_pressed(KeyCode::Up);
        let fire = frame.input.just_pressed(KeyCode::X);

        let Some(entity) = frame.entity_mut(id) else {
            return;
        };
        if axis != 0.0 {
            entity.transform.rotation = if axis < 0.0 { PI } else { 0.0 };
        }
        let facing = if entity.transform.faces_left() { -1.0 } else { 1.0 };
        if let Some(drawable) = entity.drawable.as_mut() {
            drawable.flip_x = facing < 0.0;
        }
        if let Some(body) = entity.body.as_mut() {
            body.velocity.x = axis * self.move_speed;
            if jump && self.on_ground {
                body.velocity.y = -self.jump_speed;
            }
        }

        integrate(frame.registry, id, delta_time);
        let contacts = physics::resolve_against(frame.registry, id, Category::GROUND);
        self.on_ground = contacts.below;

        if let Some(spike) = first_spike(frame.registry, &contacts.touched) {
            let target = spike.respawn.unwrap_or(self.spawn_point);
            self.hurt(1.0);
            self.respawn(id, frame.registry, target);
        }

        let fell_out = match (frame.shared.level_bounds, frame.entity(id)) {
            (Some(bounds), Some(entity)) => entity.transform.position.y > bounds.y + bounds.h,
            _ => false,
        };
        if fell_out {
            log::debug!("Player fell out of the level");
            self.hurt(1.0);
            self.respawn(id, frame.registry, self.spawn_point);
        }

        let contact_damage = physics::overlapping(frame.registry, id, Category::ENEMY)
            .into_iter()
            .filter_map(|enemy| match frame.registry.get(enemy)?.behavior()? {
                Actor::FlyingEnemy(enemy) => Some(enemy.contact_damage()),
                _ => None,
            })
            .fold(0.0_f32, f32::max);
        if contact_damage > 0.0 && self.hurt(contact_damage) {
            frame.audio.play("Hurt.wav", false);
        }

        if fire && self.fire_timer >= self.fire_cooldown {
            self.shoot(id, frame, facing);
        }

        if self.health <= 0.0 {
            log::info!("Player died, restarting level");
            self.health = self.max_health;
            if let Err(err) = frame.scenes.reset_scene(SCENE_FADE) {
                log::warn!("Level restart refused: {err}");
            }
        }
    }

    fn shoot(&mut self, id: EntityId, frame: &mut Frame<'_, Actor>, facing: f32) {
        let Some(fireball) = acquire(frame.registry, Category::FIREBALL) else {
            log::trace!("No fireball available");
            return;
        };
        let Some(origin) = frame.entity(id).map(|entity| {
            entity.transform.position + Vec2::new(facing * entity.transform.size.x / 2.0, 0.0)
        }) else {
            return;
        };

        if FireBall::launch(frame.registry, fireball, origin, facing) {
            self.fire_timer = 0.0;
            frame.audio.play("Fireball.wav", false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::harness::World;
    use crate::actors::{FlyingEnemy, Ground};
    use approx::assert_relative_eq;
    use platform_engine::ecs::components::{Collider, Drawable, RigidBody};
    use platform_engine::ecs::Entity;
    use platform_engine::foundation::math::Rect;
    use platform_engine::render::Color;
    use platform_engine::scene::TransitionPhase;

    fn spawn_player(world: &mut World, at: Vec2) -> EntityId {
        let tuning = world.shared.player_tuning.clone();
        let id = world.registry.add(
            Entity::new(Actor::Player(Player::new(&tuning, 1.0)))
                .with_size(tuning.width, tuning.height)
                .with_body(RigidBody::with_gravity(tuning.gravity, tuning.max_fall_speed))
                .with_collider(Collider::centered(tuning.width, tuning.height))
                .with_drawable(Drawable::rect(Color::WHITE, 10)),
        );
        Player::enter_level(&mut world.registry, id, at);
        world.shared.player = Some(id);
        id
    }

    fn floor(world: &mut World, y: f32) {
        world.registry.add(
            Entity::new(Actor::Ground(Ground::solid()))
                .with_position(Vec2::new(0.0, y))
                .with_collider(Collider::centered(2000.0, 20.0))
                .in_category(Category::GROUND),
        );
    }

    fn player(world: &World, id: EntityId) -> &Player {
        match world.registry.get(id).and_then(|e| e.behavior()) {
            Some(Actor::Player(player)) => player,
            other => panic!("not a player: {other:?}"),
        }
    }

    #[test]
    fn test_lands_and_jumps() {
        let mut world = World::new();
        floor(&mut world, 100.0);
        let id = spawn_player(&mut world, Vec2::new(0.0, 40.0));

        for _ in 0..30 {
            world.pass(1.0 / 60.0);
        }
        assert!(player(&world, id).on_ground());
        // Standing on the floor's top edge
        assert_relative_eq!(world.registry.get(id).unwrap().transform.position.y, 90.0 - 42.5, epsilon = 1e-3);

        world.input.handle_key(KeyCode::Space, true);
        world.pass(1.0 / 60.0);
        assert!(!player(&world, id).on_ground());
        assert!(world.registry.get(id).unwrap().body.as_ref().unwrap().velocity.y < 0.0);
    }

    #[test]
    fn test_runs_and_faces_input() {
        let mut world = World::new();
        let id = spawn_player(&mut world, Vec2::zeros());
        world.input.handle_key(KeyCode::Left, true);

        world.pass(0.1);
        let entity = world.registry.get(id).unwrap();
        assert_relative_eq!(entity.transform.position.x, -40.0, epsilon = 1e-3);
        assert!(entity.transform.faces_left());
        assert!(entity.drawable.as_ref().unwrap().flip_x);
    }

    #[test]
    fn test_spike_respawns_and_hurts() {
        let mut world = World::new();
        world.registry.add(
            Entity::new(Actor::Ground(Ground::spike(Some(Vec2::new(-300.0, 0.0)))))
                .with_position(Vec2::new(0.0, 50.0))
                .with_collider(Collider::centered(200.0, 40.0))
                .in_category(Category::GROUND),
        );
        let id = spawn_player(&mut world, Vec2::zeros());

        world.pass(0.016);
        assert_eq!(world.registry.get(id).unwrap().transform.position, Vec2::new(-300.0, 0.0));
        assert_relative_eq!(player(&world, id).health(), 4.0);
    }

    #[test]
    fn test_falling_out_returns_to_spawn() {
        let mut world = World::new();
        world.shared.level_bounds = Some(Rect::new(0.0, 0.0, 1000.0, 500.0));
        let id = spawn_player(&mut world, Vec2::new(100.0, 100.0));
        world.registry.get_mut(id).unwrap().transform.position.y = 900.0;

        world.pass(0.016);
        assert_eq!(world.registry.get(id).unwrap().transform.position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_shoots_pooled_fireball_with_cooldown() {
        let mut world = World::new();
        let fireball = world.registry.add(
            Entity::new(Actor::FireBall(FireBall::new(1200.0, 1.0, 10.0)))
                .with_state(EntityState::Paused)
                .with_body(RigidBody::new())
                .with_collider(Collider::centered(10.0, 10.0))
                .in_category(Category::FIREBALL),
        );
        let id = spawn_player(&mut world, Vec2::zeros());

        world.input.handle_key(KeyCode::X, true);
        world.pass(0.016);
        assert_eq!(world.registry.get(fireball).unwrap().state, EntityState::Active);
        assert!(world.registry.get(fireball).unwrap().transform.position.x > 0.0);

        // Pool is empty until the fireball expires
        world.input.handle_key(KeyCode::X, false);
        world.input.handle_key(KeyCode::X, true);
        world.pass(0.016);
        assert_eq!(acquire(&world.registry, Category::FIREBALL), None);
        assert!(world.registry.contains(id));
    }

    #[test]
    fn test_enemy_contact_kills_and_restarts_level() {
        let mut world = World::new();
        world.shared.player_tuning.health = 1.0;
        let id = spawn_player(&mut world, Vec2::zeros());
        let tuning = world.shared.enemy_tuning.clone();
        world.registry.add(
            Entity::new(Actor::FlyingEnemy(FlyingEnemy::new(&tuning, 1.0, Vec2::zeros())))
                .with_state(EntityState::Paused)
                .with_collider(Collider::centered(50.0, 80.0))
                .in_category(Category::ENEMY),
        );

        world.pass(0.016);
        assert_eq!(world.scenes.phase(), TransitionPhase::Entering);
        assert_eq!(world.scenes.next(), Some(crate::scenes::GameScene::Forest));
        assert_relative_eq!(player(&world, id).health(), 1.0);
    }

    #[test]
    fn test_enter_level_moves_player_to_back() {
        let mut world = World::new();
        let id = spawn_player(&mut world, Vec2::zeros());
        floor(&mut world, 100.0);
        world.registry.get_mut(id).unwrap().state = EntityState::Paused;

        assert!(Player::enter_level(&mut world.registry, id, Vec2::new(5.0, 5.0)));
        assert_eq!(world.registry.live().last(), Some(&id));
        let entity = world.registry.get(id).unwrap();
        assert_eq!(entity.state, EntityState::Active);
        assert_eq!(entity.transform.position, Vec2::new(5.0, 5.0));
    }
}
