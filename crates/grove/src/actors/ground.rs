//! Level geometry

use platform_engine::ecs::{EntityId, EntityRegistry, Frame};
use platform_engine::foundation::math::Vec2;

use super::Actor;

/// Back-and-forth movement of a platform
#[derive(Debug, Clone, PartialEq)]
pub struct GroundMotion {
    velocity: Vec2,
    duration: f32,
    timer: f32,
}

impl GroundMotion {
    /// Move at `velocity`, reversing every `duration` seconds
    pub fn new(velocity: Vec2, duration: f32) -> Self {
        Self {
            velocity,
            duration: duration.max(0.0),
            timer: 0.0,
        }
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn step(&mut self, delta_time: f32) -> Vec2 {
        self.timer += delta_time;
        if self.duration > 0.0 && self.timer >= self.duration {
            self.timer -= self.duration;
            self.velocity = -self.velocity;
        }
        self.velocity * delta_time
    }
}

/// A ground block, possibly moving or spiked
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ground {
    /// Touching it hurts and sends the player back
    pub spike: bool,
    /// Where the player reappears after touching this spike
    pub respawn: Option<Vec2>,
    motion: Option<GroundMotion>,
}

impl Ground {
    /// A plain solid block
    pub fn solid() -> Self {
        Self::default()
    }

    /// A spike sending the player to `respawn`, or its spawn point if `None`
    pub fn spike(respawn: Option<Vec2>) -> Self {
        Self {
            spike: true,
            respawn,
            motion: None,
        }
    }

    /// Make the block move
    pub fn with_motion(mut self, motion: GroundMotion) -> Self {
        self.motion = Some(motion);
        self
    }

    /// Whether the block moves
    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    pub(crate) fn update(&mut self, id: EntityId, frame: &mut Frame<'_, Actor>, delta_time: f32) {
        let Some(motion) = self.motion.as_mut() else {
            return;
        };
        if let Some(entity) = frame.entity_mut(id) {
            entity.transform.position += motion.step(delta_time);
        }
    }
}

/// First spiked ground among `touched`
pub(crate) fn first_spike<'a>(registry: &'a EntityRegistry<Actor>, touched: &[EntityId]) -> Option<&'a Ground> {
    touched.iter().find_map(|&id| match registry.get(id)?.behavior()? {
        Actor::Ground(ground) if ground.spike => Some(ground),
        _ => None,
    })
}
