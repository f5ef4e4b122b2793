//! Flying enemy
//!
//! Wanders left and right until the player comes close, then homes in on
//! the player for good. Hits knock it back briefly; at zero health it bursts
//! into particles, shakes the camera and freezes the game for a moment.

use std::f32::consts::{PI, TAU};

use platform_engine::ecs::{Category, Entity, EntityId, EntityRegistry, Frame};
use platform_engine::foundation::math::Vec2;
use platform_engine::physics;
use platform_engine::render::Color;

use super::ground::first_spike;
use super::{integrate, Actor, ParticleEmitter};
use crate::config::EnemyTuning;

const DEATH_SHAKE_TIME: f32 = 0.3;
const BLOOD: Color = Color::rgb(226, 90, 70);

/// Flying enemy state
#[derive(Debug, Clone, PartialEq)]
pub struct FlyingEnemy {
    move_speed: f32,
    wander_speed: f32,
    wander_interval: f32,
    spot_distance: f32,
    knockback_speed: f32,
    knockback_duration: f32,
    contact_damage: f32,
    death_shake: f32,
    health: f32,
    spotted: bool,
    wander_timer: f32,
    knockback_timer: f32,
    home: Vec2,
}

impl FlyingEnemy {
    /// Enemy guarding `home` (world units)
    pub fn new(tuning: &EnemyTuning, scale: f32, home: Vec2) -> Self {
        Self {
            move_speed: tuning.move_speed * scale,
            wander_speed: tuning.wander_speed * scale,
            wander_interval: tuning.wander_interval,
            spot_distance: tuning.spot_distance * scale,
            knockback_speed: tuning.knockback_speed * scale,
            knockback_duration: tuning.knockback_duration,
            contact_damage: tuning.contact_damage,
            death_shake: tuning.death_shake * scale,
            health: tuning.health,
            spotted: false,
            wander_timer: 0.0,
            knockback_timer: tuning.knockback_duration,
            home,
        }
    }

    /// Take `damage`; returns the knockback speed to apply
    pub fn hit(&mut self, damage: f32) -> f32 {
        self.health -= damage;
        self.knockback_timer = 0.0;
        self.knockback_speed
    }

    /// Remaining health
    pub fn health(&self) -> f32 {
        self.health
    }

    /// Whether health ran out
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Whether the player has been spotted
    pub fn is_chasing(&self) -> bool {
        self.spotted
    }

    /// Damage dealt to the player on contact
    pub fn contact_damage(&self) -> f32 {
        self.contact_damage
    }

    fn knocked_back(&self) -> bool {
        self.knockback_timer < self.knockback_duration
    }

    pub(crate) fn update(&mut self, id: EntityId, frame: &mut Frame<'_, Actor>, delta_time: f32) {
        self.knockback_timer += delta_time;
        self.wander_timer += delta_time;

        integrate(frame.registry, id, delta_time);
        let contacts = physics::resolve_against(frame.registry, id, Category::GROUND);
        let fell_out = match (frame.shared.level_bounds, frame.entity(id)) {
            (Some(bounds), Some(entity)) => entity.transform.position.y > bounds.y + bounds.h * 2.0,
            _ => false,
        };
        if fell_out || first_spike(frame.registry, &contacts.touched).is_some() {
            if let Some(entity) = frame.entity_mut(id) {
                entity.transform.position = self.home;
            }
        }

        let player = frame
            .shared
            .player
            .and_then(|player| frame.registry.get(player))
            .filter(|player| player.is_active())
            .map(|player| player.transform.position);
        self.steer(id, frame.registry, player);

        if self.is_dead() {
            self.die(id, frame);
        }
    }

    fn steer(&mut self, id: EntityId, registry: &mut EntityRegistry<Actor>, player: Option<Vec2>) {
        let Some(entity) = registry.get_mut(id) else {
            return;
        };
        let position = entity.transform.position;

        let speed = match player {
            Some(target) if self.spotted => {
                let to_player = target - position;
                entity.transform.rotation = to_player.y.atan2(to_player.x).rem_euclid(TAU);
                self.move_speed
            }
            _ => {
                if self.wander_timer > self.wander_interval {
                    // Flip between facing right (0) and left (PI)
                    entity.transform.rotation = (entity.transform.rotation - PI).abs();
                    self.wander_timer = 0.0;
                }
                if player.is_some_and(|target| (target - position).norm() < self.spot_distance) {
                    log::debug!("Enemy spotted the player");
                    self.spotted = true;
                }
                self.wander_speed
            }
        };

        if !self.knocked_back() {
            let forward = entity.transform.forward();
            if let Some(body) = entity.body.as_mut() {
                body.set_velocity(forward * speed);
            }
        }
        if let Some(drawable) = entity.drawable.as_mut() {
            drawable.flip_x = entity.transform.forward().x < 0.0;
        }
    }

    fn die(&self, id: EntityId, frame: &mut Frame<'_, Actor>) {
        let Some(entity) = frame.entity_mut(id) else {
            return;
        };
        entity.destroy();
        let position = entity.transform.position;
        let size = (entity.transform.size.x + entity.transform.size.y) / 2.0;

        frame.camera.shake(DEATH_SHAKE_TIME, self.death_shake);
        frame.trigger_hitstop();
        frame.audio.play("EnemyDeath.wav", false);
        frame.shared.kills += 1;

        let scale = frame.shared.scale;
        let burst = ParticleEmitter::new(15, 300.0 * scale, 0.7, (size * 0.12).max(2.0))
            .with_color(BLOOD)
            .with_direction(Vec2::new(0.0, 1.0), PI / 3.0)
            .with_gravity(1500.0 * scale);
        frame.spawn(Entity::new(Actor::Emitter(burst)).with_position(position));
        log::debug!("Enemy died at ({:.0}, {:.0})", position.x, position.y);
    }
}

/// Hit enemy `id` for `damage`, knocking it back along `direction`
///
/// Returns false if `id` is not an enemy that can be hit right now.
pub fn strike(registry: &mut EntityRegistry<Actor>, id: EntityId, damage: f32, direction: Vec2) -> bool {
    let Some(entity) = registry.get_mut(id) else {
        return false;
    };
    let knockback = match entity.behavior_mut() {
        Some(Actor::FlyingEnemy(enemy)) => enemy.hit(damage),
        _ => return false,
    };
    if let Some(body) = entity.body.as_mut() {
        body.set_velocity(direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec2::zeros) * knockback);
    }
    true
}
