//! Collision capability
//!
//! Axis-aligned boxes only. The collider stores its box relative to the
//! entity center; [`Collider::world_bounds`] places it in the world.

use crate::foundation::math::Vec2;

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Aabb {
    /// Create a box from its corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Whether the two boxes overlap (touching edges do not count)
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Smallest translation that moves `self` out of `other`
    ///
    /// Returns `None` when the boxes do not overlap. The push is along the
    /// axis of least penetration.
    pub fn separation(&self, other: &Self) -> Option<Vec2> {
        if !self.intersects(other) {
            return None;
        }

        let push_left = other.min.x - self.max.x;
        let push_right = other.max.x - self.min.x;
        let push_up = other.min.y - self.max.y;
        let push_down = other.max.y - self.min.y;

        let dx = if push_right < -push_left { push_right } else { push_left };
        let dy = if push_down < -push_up { push_down } else { push_up };

        if dx.abs() < dy.abs() {
            Some(Vec2::new(dx, 0.0))
        } else {
            Some(Vec2::new(0.0, dy))
        }
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }
}

/// Component describing an entity's collision box
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    /// Box corner offsets from the entity center
    pub offset_min: Vec2,
    /// Box corner offsets from the entity center
    pub offset_max: Vec2,
    /// Inactive colliders are ignored by queries
    pub active: bool,
}

impl Collider {
    /// Box of `width` x `height` centered on the entity
    pub fn centered(width: f32, height: f32) -> Self {
        let half = Vec2::new(width / 2.0, height / 2.0);
        Self {
            offset_min: -half,
            offset_max: half,
            active: true,
        }
    }

    /// Place the box at `position`
    pub fn world_bounds(&self, position: Vec2) -> Aabb {
        Aabb::new(position + self.offset_min, position + self.offset_max)
    }

    /// Resize the box, keeping it centered
    pub fn resize(&mut self, width: f32, height: f32) {
        let half = Vec2::new(width / 2.0, height / 2.0);
        self.offset_min = -half;
        self.offset_max = half;
    }
}
