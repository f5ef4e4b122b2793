//! Entity implementation
//!
//! An entity is a plain data record: lifecycle state, transform, optional
//! capability modules and a game-defined behavior value. The registry owns
//! every entity; everything else refers to them through [`EntityId`].

use crate::ecs::components::{Collider, Drawable, RigidBody};
use crate::ecs::registry::Category;
use crate::foundation::math::{Transform2D, Vec2};

slotmap::new_key_type! {
    /// Generational entity identifier
    ///
    /// Ids are never reused: once an entity is removed, lookups with its id
    /// fail instead of reaching a newer entity in the same slot.
    pub struct EntityId;
}

/// Lifecycle state of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityState {
    /// Updated every frame
    #[default]
    Active,
    /// Kept alive but skipped by the update pass
    Paused,
    /// Finalized at the end of the current update pass
    Destroy,
}

/// A live game object
#[derive(Debug)]
pub struct Entity<B> {
    /// Id assigned by the level editor, if the entity came from level data
    pub level_id: Option<i32>,

    /// Lifecycle state
    pub state: EntityState,

    /// Position, rotation and size
    pub transform: Transform2D,

    /// Velocity integration
    pub body: Option<RigidBody>,

    /// Collision shape
    pub collider: Option<Collider>,

    /// Draw description
    pub drawable: Option<Drawable>,

    pub(crate) categories: Category,
    pub(crate) behavior: Option<B>,
}

impl<B> Entity<B> {
    /// Create an active entity driven by `behavior`
    pub fn new(behavior: B) -> Self {
        Self {
            level_id: None,
            state: EntityState::Active,
            transform: Transform2D::default(),
            body: None,
            collider: None,
            drawable: None,
            categories: Category::empty(),
            behavior: Some(behavior),
        }
    }

    /// Set the level-authoring id
    pub fn with_level_id(mut self, level_id: i32) -> Self {
        self.level_id = Some(level_id);
        self
    }

    /// Set the initial state
    pub fn with_state(mut self, state: EntityState) -> Self {
        self.state = state;
        self
    }

    /// Set the initial position
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.transform.position = position;
        self
    }

    /// Set width and height
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.transform.size = Vec2::new(width, height);
        self
    }

    /// Attach a rigid body
    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a collider
    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    /// Attach a drawable
    pub fn with_drawable(mut self, drawable: Drawable) -> Self {
        self.drawable = Some(drawable);
        self
    }

    /// Index the entity in `category` once it is added to a registry
    pub fn in_category(mut self, category: Category) -> Self {
        self.categories |= category;
        self
    }

    /// Categories this entity is indexed under
    pub fn categories(&self) -> Category {
        self.categories
    }

    /// The behavior value
    ///
    /// `None` only while this entity's own update is running.
    pub fn behavior(&self) -> Option<&B> {
        self.behavior.as_ref()
    }

    /// Mutable access to the behavior value
    pub fn behavior_mut(&mut self) -> Option<&mut B> {
        self.behavior.as_mut()
    }

    /// Whether the update pass will run this entity
    pub fn is_active(&self) -> bool {
        self.state == EntityState::Active
    }

    /// Mark the entity for removal at the end of the current pass
    pub fn destroy(&mut self) {
        self.state = EntityState::Destroy;
    }

    /// World-space collision box, if the entity has an active collider
    pub fn world_bounds(&self) -> Option<crate::ecs::components::Aabb> {
        self.collider
            .as_ref()
            .filter(|collider| collider.active)
            .map(|collider| collider.world_bounds(self.transform.position))
    }
}
