//! Box-against-category collision
//!
//! [`resolve_against`] pushes an entity out of every overlapping member of a
//! category along the axis of least penetration and cancels the velocity
//! that drove it in. Inactive colliders take no part.

use crate::ecs::{Category, EntityId, EntityRegistry};

/// Sides on which an entity touched something
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contacts {
    /// Standing on something
    pub below: bool,
    /// Bumped a ceiling
    pub above: bool,
    /// Blocked on the left
    pub left: bool,
    /// Blocked on the right
    pub right: bool,
    /// Everything the entity was pushed out of
    pub touched: Vec<EntityId>,
}

impl Contacts {
    /// Whether anything was touched
    pub fn any(&self) -> bool {
        !self.touched.is_empty()
    }
}

/// Members of `category` whose boxes overlap entity `id`
pub fn overlapping<B>(registry: &EntityRegistry<B>, id: EntityId, category: Category) -> Vec<EntityId> {
    let Some(bounds) = registry.get(id).and_then(|entity| entity.world_bounds()) else {
        return Vec::new();
    };

    registry
        .category(category)
        .iter()
        .copied()
        .filter(|&other| other != id)
        .filter(|&other| {
            registry
                .get(other)
                .and_then(|entity| entity.world_bounds())
                .is_some_and(|other_bounds| bounds.intersects(&other_bounds))
        })
        .collect()
}

/// Push entity `id` out of every member of `category` it overlaps
pub fn resolve_against<B>(registry: &mut EntityRegistry<B>, id: EntityId, category: Category) -> Contacts {
    let mut contacts = Contacts::default();
    let others: Vec<EntityId> = registry.category(category).to_vec();

    for other in others {
        if other == id {
            continue;
        }
        let Some(other_bounds) = registry.get(other).and_then(|entity| entity.world_bounds()) else {
            continue;
        };
        let Some(entity) = registry.get_mut(id) else {
            return contacts;
        };
        let Some(push) = entity.world_bounds().and_then(|bounds| bounds.separation(&other_bounds)) else {
            continue;
        };

        entity.transform.position += push;
        if let Some(body) = entity.body.as_mut() {
            if push.y < 0.0 && body.velocity.y > 0.0 || push.y > 0.0 && body.velocity.y < 0.0 {
                body.velocity.y = 0.0;
            }
            if push.x < 0.0 && body.velocity.x > 0.0 || push.x > 0.0 && body.velocity.x < 0.0 {
                body.velocity.x = 0.0;
            }
        }

        // y grows downward: an upward push means we landed on top
        contacts.below |= push.y < 0.0;
        contacts.above |= push.y > 0.0;
        contacts.right |= push.x < 0.0;
        contacts.left |= push.x > 0.0;
        contacts.touched.push(other);
    }
    contacts
}
