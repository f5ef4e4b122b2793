//! ECS Components module
//!
//! Capability modules an entity can own: a rigid body, a collider and a
//! drawable. Each is optional and owned exclusively by its entity.

pub mod movement;
pub mod collision;
pub mod renderable;

pub use movement::RigidBody;
pub use collision::{Aabb, Collider};
pub use renderable::{DrawKind, Drawable};
