//! Math utilities and types
//!
//! Provides the 2D math types used by entities, colliders and the camera.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Position, rotation and size of an entity in world space
///
/// `position` is the center of the entity. `rotation` is in radians and is
/// only used for facing (0 = right, PI = left) and homing movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    /// Center position in world space
    pub position: Vec2,

    /// Rotation in radians
    pub rotation: f32,

    /// Width and height
    pub size: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            size: Vec2::zeros(),
        }
    }
}

impl Transform2D {
    /// Create a transform at the given position with zero size
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Unit vector pointing along the current rotation
    pub fn forward(&self) -> Vec2 {
        Vec2::new(self.rotation.cos(), self.rotation.sin())
    }

    /// Whether the entity faces left (rotation of PI)
    pub fn faces_left(&self) -> bool {
        (self.rotation - std::f32::consts::PI).abs() < 1e-3
    }
}

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            x: center.x - size.x / 2.0,
            y: center.y - size.y / 2.0,
            w: size.x,
            h: size.y,
        }
    }

    /// Shift the rectangle by `-offset` (world space to screen space)
    pub fn translated(self, offset: Vec2) -> Self {
        Self {
            x: self.x - offset.x,
            y: self.y - offset.y,
            ..self
        }
    }
}

/// Math utility functions
pub mod utils {
    /// Clamp a value to the unit interval
    pub fn clamp01(value: f32) -> f32 {
        value.clamp(0.0, 1.0)
    }

    /// Convert a unit-interval fraction into an 8-bit alpha value
    pub fn unit_to_alpha(value: f32) -> u8 {
        // clamped first, so the cast cannot wrap
        (clamp01(value) * 255.0) as u8
    }

    /// Linear interpolation between `a` and `b`
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}
