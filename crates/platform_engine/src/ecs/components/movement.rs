//! Rigid body capability for entities that move
//!
//! A minimal 2D mover: acceleration accumulates forces for one step, gravity
//! and horizontal friction are optional, and fall speed is capped.

use crate::foundation::math::{Transform2D, Vec2};

/// Component for entities that move under velocity and forces
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    /// Linear velocity in units per second
    pub velocity: Vec2,

    /// Acceleration accumulated for the current step
    pub acceleration: Vec2,

    /// Mass used by [`RigidBody::apply_force`]
    pub mass: f32,

    /// Horizontal friction coefficient (0 = none)
    pub friction: f32,

    /// Downward acceleration applied each step, if any
    pub gravity: Option<f32>,

    /// Maximum downward speed (0 = no limit)
    pub max_fall_speed: f32,

    /// Whether integration is enabled
    pub enabled: bool,
}

impl RigidBody {
    /// Create a weightless body with no friction
    pub fn new() -> Self {
        Self {
            velocity: Vec2::zeros(),
            acceleration: Vec2::zeros(),
            mass: 1.0,
            friction: 0.0,
            gravity: None,
            max_fall_speed: 0.0,
            enabled: true,
        }
    }

    /// Create a body pulled down by `gravity`
    pub fn with_gravity(gravity: f32, max_fall_speed: f32) -> Self {
        Self {
            gravity: Some(gravity),
            max_fall_speed,
            ..Self::new()
        }
    }

    /// Set horizontal friction
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction.max(0.0);
        self
    }

    /// Set velocity
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Accumulate a force for the next step
    pub fn apply_force(&mut self, force: Vec2) {
        if self.mass > 0.0 {
            self.acceleration += force / self.mass;
        }
    }

    /// Integrate one step and move `transform`
    pub fn integrate(&mut self, transform: &mut Transform2D, delta_time: f32) {
        if !self.enabled {
            return;
        }

        if let Some(gravity) = self.gravity {
            self.acceleration.y += gravity;
        }
        if self.friction > 0.0 {
            self.acceleration.x -= self.friction * self.velocity.x;
        }

        self.velocity += self.acceleration * delta_time;

        if self.max_fall_speed > 0.0 && self.velocity.y > self.max_fall_speed {
            self.velocity.y = self.max_fall_speed;
        }
        // Kill jitter around zero
        if self.velocity.x.abs() < 0.05 {
            self.velocity.x = 0.0;
        }

        transform.position += self.velocity * delta_time;
        self.acceleration = Vec2::zeros();
    }

    /// Stop all movement
    pub fn stop(&mut self) {
        self.velocity = Vec2::zeros();
        self.acceleration = Vec2::zeros();
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_integration_moves_transform() {
        let mut body = RigidBody::new();
        body.set_velocity(Vec2::new(2.0, 0.0));
        let mut transform = Transform2D::default();

        body.integrate(&mut transform, 0.5);
        assert_relative_eq!(transform.position.x, 1.0);
    }

    #[test]
    fn test_forces_reset_after_step() {
        let mut body = RigidBody::new();
        body.mass = 2.0;
        body.apply_force(Vec2::new(4.0, 0.0));
        let mut transform = Transform2D::default();

        body.integrate(&mut transform, 1.0);
        assert_relative_eq!(body.velocity.x, 2.0);
        assert_eq!(body.acceleration, Vec2::zeros());
    }

    #[test]
    fn test_fall_speed_capped() {
        let mut body = RigidBody::with_gravity(1000.0, 300.0);
        let mut transform = Transform2D::default();

        body.integrate(&mut transform, 1.0);
        assert_relative_eq!(body.velocity.y, 300.0);
    }

    #[test]
    fn test_disabled_body_does_not_move() {
        let mut body = RigidBody::new();
        body.set_velocity(Vec2::new(5.0, 5.0));
        body.enabled = false;
        let mut transform = Transform2D::default();

        body.integrate(&mut transform, 1.0);
        assert_eq!(transform.position, Vec2::zeros());
    }
}
