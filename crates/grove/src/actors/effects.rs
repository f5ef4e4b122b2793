//! Pooled shots and particles
//!
//! Fireballs and particles are created once per level, parked in
//! [`EntityState::Paused`](platform_engine::ecs::EntityState), and woken on
//! demand. Nothing here ever allocates an entity during play except the
//! short-lived [`ParticleEmitter`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use platform_engine::ecs::components::DrawKind;
use platform_engine::ecs::{Category, EntityId, EntityRegistry, Frame};
use platform_engine::foundation::math::Vec2;
use platform_engine::physics;
use platform_engine::render::Color;

use super::{acquire, enemy, integrate, park, wake, Actor};

/// Player shot
#[derive(Debug, Clone, PartialEq)]
pub struct FireBall {
    speed: f32,
    lifetime: f32,
    damage: f32,
    timer: f32,
}

impl FireBall {
    /// Create a parked fireball
    pub fn new(speed: f32, lifetime: f32, damage: f32) -> Self {
        Self {
            speed,
            lifetime,
            damage,
            timer: 0.0,
        }
    }

    /// Wake pooled fireball `id` at `position`, flying along `direction`
    ///
    /// Returns false if `id` is not a fireball.
    pub fn launch(registry: &mut EntityRegistry<Actor>, id: EntityId, position: Vec2, direction: f32) -> bool {
        let Some(entity) = registry.get_mut(id) else {
            return false;
        };
        let speed = match entity.behavior_mut() {
            Some(Actor::FireBall(fireball)) => {
                fireball.timer = 0.0;
                fireball.speed
            }
            _ => return false,
        };

        let direction = direction.signum();
        entity.transform.position = position;
        entity.transform.rotation = if direction < 0.0 { std::f32::consts::PI } else { 0.0 };
        if let Some(body) = entity.body.as_mut() {
            body.set_velocity(Vec2::new(direction * speed, 0.0));
        }
        if let Some(drawable) = entity.drawable.as_mut() {
            drawable.flip_x = direction < 0.0;
        }
        wake(entity);
        true
    }

    pub(crate) fn update(&mut self, id: EntityId, frame: &mut Frame<'_, Actor>, delta_time: f32) {
        self.timer += delta_time;
        if self.timer >= self.lifetime {
            if let Some(entity) = frame.entity_mut(id) {
                park(entity);
            }
            return;
        }

        integrate(frame.registry, id, delta_time);

        let enemies = physics::overlapping(frame.registry, id, Category::ENEMY);
        let blocked = !physics::overlapping(frame.registry, id, Category::GROUND).is_empty();
        if enemies.is_empty() && !blocked {
            return;
        }

        let heading = frame.entity(id).map_or(Vec2::x(), |entity| entity.transform.forward());
        if let Some(&target) = enemies.first() {
            if enemy::strike(frame.registry, target, self.damage, heading) {
                frame.audio.play("Hit.wav", false);
            }
        }
        if let Some(entity) = frame.entity_mut(id) {
            park(entity);
        }
    }
}

/// Cosmetic particle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Particle {
    lifetime: f32,
    timer: f32,
}

impl Particle {
    /// Create a parked particle
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn update(&mut self, id: EntityId, frame: &mut Frame<'_, Actor>, delta_time: f32) {
        self.timer += delta_time;
        if self.timer >= self.lifetime {
            if let Some(entity) = frame.entity_mut(id) {
                park(entity);
            }
            return;
        }
        integrate(frame.registry, id, delta_time);
    }
}

/// Emits a burst of pooled particles on its first update, then destroys
/// itself
#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    count: usize,
    speed: f32,
    lifetime: f32,
    size: f32,
    color: Color,
    direction: Vec2,
    spread: f32,
    gravity: Option<f32>,
    rng: StdRng,
}

impl ParticleEmitter {
    /// Burst of `count` particles
    pub fn new(count: usize, speed: f32, lifetime: f32, size: f32) -> Self {
        Self {
            count,
            speed,
            lifetime,
            size,
            color: Color::WHITE,
            direction: Vec2::new(0.0, -1.0),
            spread: std::f32::consts::FRAC_PI_2,
            gravity: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Particle color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Main direction and half-angle of the burst
    pub fn with_direction(mut self, direction: Vec2, spread: f32) -> Self {
        self.direction = direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec2::x);
        self.spread = spread.abs();
        self
    }

    /// Let particles fall
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = Some(gravity);
        self
    }

    /// Seed the burst pattern
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub(crate) fn update(&mut self, id: EntityId, frame: &mut Frame<'_, Actor>) {
        let Some(origin) = frame.entity(id).map(|entity| entity.transform.position) else {
            return;
        };

        let mut emitted = 0;
        while emitted < self.count {
            let Some(particle) = acquire(frame.registry, Category::PARTICLE) else {
                log::warn!("Particle pool exhausted after {emitted} of {}", self.count);
                break;
            };
            let angle = self.rng.gen_range(-self.spread..=self.spread);
            let (sin, cos) = angle.sin_cos();
            let heading = Vec2::new(
                self.direction.x * cos - self.direction.y * sin,
                self.direction.x * sin + self.direction.y * cos,
            );
            let velocity = heading * self.speed * self.rng.gen_range(0.5..=1.0);

            let Some(entity) = frame.entity_mut(particle) else {
                break;
            };
            entity.transform.position = origin;
            entity.transform.size = Vec2::new(self.size, self.size);
            if let Some(body) = entity.body.as_mut() {
                body.set_velocity(velocity);
                body.gravity = self.gravity;
            }
            if let Some(drawable) = entity.drawable.as_mut() {
                drawable.kind = DrawKind::Rect { color: self.color };
            }
            if let Some(Actor::Particle(state)) = entity.behavior_mut() {
                state.lifetime = self.lifetime;
                state.timer = 0.0;
            }
            wake(entity);
            emitted += 1;
        }

        log::trace!("Emitter burst: {emitted} particles");
        if let Some(entity) = frame.entity_mut(id) {
            entity.destroy();
        }
    }
}
