//! Entity registry and update protocol
//!
//! Entities are plain records owned by an [`EntityRegistry`]. Logic lives in
//! a game-defined [`Behavior`] value run once per frame by the registry's
//! update pass, with the rest of the engine lent through a [`Frame`].

pub mod entity;
pub mod components;
pub mod registry;
pub mod system;
pub mod scheduler;

pub use entity::{Entity, EntityId, EntityState};
pub use registry::{Category, EntityRegistry, PassReport};
pub use system::{Behavior, Frame, SceneContext};
pub use scheduler::Hitstop;
