//! Entity registry
//!
//! Owns every entity through a slot map and keeps three id sequences on top
//! of it:
//!
//! - the live sequence, in update order
//! - the pending buffer, holding entities created while an update pass runs
//! - one index per [`Category`], holding non-owning ids for fast queries
//!
//! ## Update pass protocol
//!
//! 1. The updating flag is raised and every `Active` entity of the live
//!    sequence, as it was when the pass started, is updated in order.
//! 2. The flag is lowered and the pending buffer is appended to the live
//!    sequence in insertion order.
//! 3. Entities left in [`EntityState::Destroy`] are collected and only then
//!    finalized, each one re-checked for registration first.

use slotmap::SlotMap;

use super::entity::{Entity, EntityId, EntityState};

bitflags::bitflags! {
    /// Category indices an entity can be listed under
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Category: u8 {
        /// Solid level geometry
        const GROUND = 1 << 0;
        /// Hostile actors
        const ENEMY = 1 << 1;
        /// Enemy shots
        const PROJECTILE = 1 << 2;
        /// Pooled cosmetic particles
        const PARTICLE = 1 << 3;
        /// Pooled player shots
        const FIREBALL = 1 << 4;
    }
}

const CATEGORY_COUNT: usize = 5;

/// Index slot of a single-flag category
fn index_slot(category: Category) -> Option<usize> {
    (category.bits().count_ones() == 1).then(|| category.bits().trailing_zeros() as usize)
}

/// Counts produced by one update pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassReport {
    /// Entities whose behavior ran
    pub updated: usize,
    /// Pending entities merged into the live sequence
    pub merged: usize,
    /// Entities finalized by the destroy sweep
    pub destroyed: usize,
}

/// Owner of all live entities
pub struct EntityRegistry<B> {
    slots: SlotMap<EntityId, Entity<B>>,
    live: Vec<EntityId>,
    pending: Vec<EntityId>,
    indices: [Vec<EntityId>; CATEGORY_COUNT],
    // Reused by every pass for the live snapshot and the destroy sweep
    scratch: Vec<EntityId>,
    updating: bool,
}

impl<B> EntityRegistry<B> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            live: Vec::new(),
            pending: Vec::new(),
            indices: Default::default(),
            scratch: Vec::new(),
            updating: false,
        }
    }

    /// Register an entity and index it under its declared categories
    ///
    /// During an update pass the entity waits in the pending buffer and is
    /// not updated until the next pass.
    pub fn add(&mut self, entity: Entity<B>) -> EntityId {
        let categories = entity.categories;
        let id = self.slots.insert(entity);

        for category in categories.iter() {
            if let Some(slot) = index_slot(category) {
                self.indices[slot].push(id);
            }
        }

        if self.updating {
            self.pending.push(id);
        } else {
            self.live.push(id);
        }
        id
    }

    /// Unregister an entity and return it
    ///
    /// The id is dropped from the pending buffer or the live sequence
    /// (swap-remove, so order among the rest is not kept) and from every
    /// category index. Unknown or already removed ids are a no-op.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity<B>> {
        let entity = self.slots.remove(id)?;

        if let Some(pos) = self.pending.iter().position(|&other| other == id) {
            self.pending.swap_remove(pos);
        } else if let Some(pos) = self.live.iter().position(|&other| other == id) {
            self.live.swap_remove(pos);
        }

        for category in entity.categories.iter() {
            if let Some(slot) = index_slot(category) {
                self.indices[slot].retain(|&other| other != id);
            }
        }
        Some(entity)
    }

    /// Remove every entity for which `keep` returns false
    ///
    /// Returns how many were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(EntityId, &Entity<B>) -> bool) -> usize {
        let doomed: Vec<EntityId> = self
            .slots
            .iter()
            .filter(|&(id, entity)| !keep(id, entity))
            .map(|(id, _)| id)
            .collect();

        let count = doomed.len();
        for id in doomed {
            self.remove(id);
        }
        count
    }

    /// Run one update pass
    ///
    /// `update` receives the registry itself, so behaviors may add, remove
    /// or destroy entities while the pass is running. The behavior being
    /// updated is lent out for the call; `get(id).behavior()` is `None`
    /// meanwhile.
    pub fn run_update_pass<F>(&mut self, delta_time: f32, mut update: F) -> PassReport
    where
        F: FnMut(&mut Self, EntityId, &mut B, f32),
    {
        let mut report = PassReport::default();

        // Removals swap-remove from `live`, so walk a copy of it
        let mut snapshot = std::mem::take(&mut self.scratch);
        snapshot.clear();
        snapshot.extend_from_slice(&self.live);

        self.updating = true;
        for &id in &snapshot {
            let Some(entity) = self.slots.get_mut(id) else {
                continue;
            };
            if !entity.is_active() {
                continue;
            }
            let Some(mut behavior) = entity.behavior.take() else {
                continue;
            };

            update(self, id, &mut behavior, delta_time);
            report.updated += 1;

            // Removed during its own update: the behavior goes with it
            if let Some(entity) = self.slots.get_mut(id) {
                entity.behavior = Some(behavior);
            }
        }
        self.updating = false;

        report.merged = self.pending.len();
        self.live.append(&mut self.pending);

        snapshot.clear();
        snapshot.extend(
            self.live
                .iter()
                .copied()
                .filter(|&id| self.slots.get(id).is_some_and(|e| e.state == EntityState::Destroy)),
        );
        for &id in &snapshot {
            if self.slots.contains_key(id) && self.remove(id).is_some() {
                report.destroyed += 1;
            }
        }
        snapshot.clear();
        self.scratch = snapshot;

        log::trace!(
            "Update pass: {} updated, {} merged, {} destroyed",
            report.updated,
            report.merged,
            report.destroyed
        );
        report
    }

    /// List an entity under additional categories
    ///
    /// Returns false if the entity is not registered.
    pub fn add_to_category(&mut self, id: EntityId, category: Category) -> bool {
        let Some(entity) = self.slots.get_mut(id) else {
            return false;
        };

        let new = category - entity.categories;
        entity.categories |= new;
        for flag in new.iter() {
            if let Some(slot) = index_slot(flag) {
                self.indices[slot].push(id);
            }
        }
        true
    }

    /// Drop an entity from some category indices
    pub fn remove_from_category(&mut self, id: EntityId, category: Category) {
        let Some(entity) = self.slots.get_mut(id) else {
            return;
        };

        let listed = category & entity.categories;
        entity.categories -= listed;
        for flag in listed.iter() {
            if let Some(slot) = index_slot(flag) {
                self.indices[slot].retain(|&other| other != id);
            }
        }
    }

    /// Ids listed under a single category
    ///
    /// Combined flags have no index of their own and yield an empty slice.
    pub fn category(&self, category: Category) -> &[EntityId] {
        index_slot(category).map_or(&[], |slot| self.indices[slot].as_slice())
    }

    /// First entity in `category` whose level id matches
    pub fn find_by_level_id(&self, category: Category, level_id: i32) -> Option<EntityId> {
        self.category(category)
            .iter()
            .copied()
            .find(|&id| self.slots.get(id).is_some_and(|e| e.level_id == Some(level_id)))
    }

    /// Move a live entity to the end of the update order
    pub fn move_to_back(&mut self, id: EntityId) -> bool {
        match self.live.iter().position(|&other| other == id) {
            Some(pos) => {
                self.live.remove(pos);
                self.live.push(id);
                true
            }
            None => false,
        }
    }

    /// Drawable entities in draw order
    ///
    /// Sorted by `draw_order`; entities with equal keys keep their live
    /// order. Hidden drawables and sprites without a texture are left out.
    pub fn draw_list(&self) -> Vec<EntityId> {
        let mut list: Vec<(i32, EntityId)> = self
            .live
            .iter()
            .filter_map(|&id| {
                let drawable = self.slots.get(id)?.drawable.as_ref()?;
                drawable.should_render().then_some((drawable.draw_order, id))
            })
            .collect();
        list.sort_by_key(|&(order, _)| order);
        list.into_iter().map(|(_, id)| id).collect()
    }

    /// Look up an entity
    pub fn get(&self, id: EntityId) -> Option<&Entity<B>> {
        self.slots.get(id)
    }

    /// Look up an entity mutably
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity<B>> {
        self.slots.get_mut(id)
    }

    /// Whether `id` refers to a registered entity
    pub fn contains(&self, id: EntityId) -> bool {
        self.slots.contains_key(id)
    }

    /// Live sequence in update order
    pub fn live(&self) -> &[EntityId] {
        &self.live
    }

    /// Entities waiting for the current pass to finish
    pub fn pending(&self) -> &[EntityId] {
        &self.pending
    }

    /// Whether an update pass is running
    pub fn is_updating(&self) -> bool {
        self.updating
    }

    /// Number of registered entities, pending included
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no entity is registered
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Live entities in update order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity<B>)> {
        self.live.iter().filter_map(|&id| self.slots.get(id).map(|e| (id, e)))
    }
}

impl<B> Default for EntityRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::Drawable;
    use crate::render::Color;

    #[derive(Debug, Default)]
    struct Counter {
        updates: u32,
    }

    fn counter() -> Entity<Counter> {
        Entity::new(Counter::default())
    }

    fn updates(registry: &EntityRegistry<Counter>, id: EntityId) -> u32 {
        registry.get(id).and_then(Entity::behavior).map_or(0, |c| c.updates)
    }

    #[test]
    fn test_add_and_remove() {
        let mut registry = EntityRegistry::new();
        let a = registry.add(counter());
        let b = registry.add(counter());
        assert_eq!(registry.live(), &[a, b]);

        assert!(registry.remove(a).is_some());
        assert_eq!(registry.live(), &[b]);
        assert!(!registry.contains(a));
    }

    #[test]
    fn test_double_remove_is_noop() {
        let mut registry = EntityRegistry::new();
        let a = registry.add(counter());
        let b = registry.add(counter());

        assert!(registry.remove(a).is_some());
        assert!(registry.remove(a).is_none());
        assert_eq!(registry.live(), &[b]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_unlinks_categories() {
        let mut registry = EntityRegistry::new();
        let ground = registry.add(counter().in_category(Category::GROUND));
        let enemy = registry.add(counter().in_category(Category::ENEMY | Category::PROJECTILE));

        assert_eq!(registry.category(Category::GROUND), &[ground]);
        assert_eq!(registry.category(Category::PROJECTILE), &[enemy]);

        registry.remove(enemy);
        assert!(registry.category(Category::ENEMY).is_empty());
        assert!(registry.category(Category::PROJECTILE).is_empty());
        assert_eq!(registry.category(Category::GROUND), &[ground]);
    }

    #[test]
    fn test_category_membership_edits() {
        let mut registry = EntityRegistry::new();
        let a = registry.add(counter());

        assert!(registry.add_to_category(a, Category::GROUND));
        assert!(registry.add_to_category(a, Category::GROUND));
        assert_eq!(registry.category(Category::GROUND), &[a]);

        registry.remove_from_category(a, Category::GROUND);
        assert!(registry.category(Category::GROUND).is_empty());
        assert!(registry.get(a).unwrap().categories().is_empty());

        registry.remove(a);
        assert!(!registry.add_to_category(a, Category::ENEMY));
    }

    #[test]
    fn test_combined_category_has_no_index() {
        let mut registry = EntityRegistry::new();
        registry.add(counter().in_category(Category::ENEMY));
        assert!(registry.category(Category::ENEMY | Category::GROUND).is_empty());
    }

    #[test]
    fn test_find_by_level_id() {
        let mut registry = EntityRegistry::new();
        registry.add(counter().with_level_id(3).in_category(Category::ENEMY));
        let ground = registry.add(counter().with_level_id(3).in_category(Category::GROUND));
        registry.add(counter().with_level_id(4).in_category(Category::GROUND));

        assert_eq!(registry.find_by_level_id(Category::GROUND, 3), Some(ground));
        assert_eq!(registry.find_by_level_id(Category::GROUND, 9), None);
    }

    #[test]
    fn test_added_during_pass_waits_for_next_pass() {
        let mut registry = EntityRegistry::new();
        let a = registry.add(counter());
        let b = registry.add(counter());
        let mut spawned = None;

        let report = registry.run_update_pass(0.016, |registry, id, counter, _| {
            counter.updates += 1;
            if id == a {
                assert!(registry.is_updating());
                spawned = Some(registry.add(self::counter()));
                assert_eq!(registry.pending().len(), 1);
            }
        });

        let c = spawned.unwrap();
        assert_eq!(registry.live(), &[a, b, c]);
        assert!(registry.pending().is_empty());
        assert_eq!(updates(&registry, c), 0);
        assert_eq!(report, PassReport { updated: 2, merged: 1, destroyed: 0 });

        registry.run_update_pass(0.016, |_, _, counter, _| counter.updates += 1);
        assert_eq!(updates(&registry, c), 1);
        assert_eq!(updates(&registry, a), 2);
    }

    #[test]
    fn test_removed_during_pass_is_skipped() {
        let mut registry = EntityRegistry::new();
        let a = registry.add(counter());
        let b = registry.add(counter());
        let c = registry.add(counter());

        registry.run_update_pass(0.016, |registry, id, counter, _| {
            counter.updates += 1;
            if id == a {
                registry.remove(b);
            }
        });

        assert!(!registry.contains(b));
        assert_eq!(updates(&registry, c), 1);
        assert_eq!(registry.live().len(), 2);
    }

    #[test]
    fn test_pass_reuses_snapshot_buffer() {
        let mut registry = EntityRegistry::new();
        for _ in 0..8 {
            registry.add(counter());
        }

        registry.run_update_pass(0.016, |_, _, counter, _| counter.updates += 1);
        let buffer = registry.scratch.as_ptr();
        let capacity = registry.scratch.capacity();
        assert!(capacity >= 8);

        for _ in 0..3 {
            registry.run_update_pass(0.016, |_, _, counter, _| counter.updates += 1);
        }
        assert_eq!(registry.scratch.as_ptr(), buffer);
        assert_eq!(registry.scratch.capacity(), capacity);
        assert!(registry.scratch.is_empty());
        assert!(registry.live().iter().all(|&id| updates(&registry, id) == 4));
    }

    #[test]
    fn test_entity_removing_itself_mid_update() {
        let mut registry = EntityRegistry::new();
        let a = registry.add(counter());
        let b = registry.add(counter());

        registry.run_update_pass(0.016, |registry, id, _, _| {
            if id == a {
                assert!(registry.get(a).unwrap().behavior().is_none());
                registry.remove(a);
            }
        });

        assert!(!registry.contains(a));
        assert_eq!(registry.live(), &[b]);
    }

    #[test]
    fn test_destroy_sweep_after_pass() {
        let mut registry = EntityRegistry::new();
        let a = registry.add(counter().in_category(Category::ENEMY));
        let b = registry.add(counter());

        let report = registry.run_update_pass(0.016, |registry, id, counter, _| {
            counter.updates += 1;
            if id == a {
                registry.get_mut(a).unwrap().destroy();
                // Still registered until the sweep
                assert!(registry.contains(a));
            }
        });

        assert_eq!(report.destroyed, 1);
        assert!(!registry.contains(a));
        assert!(registry.category(Category::ENEMY).is_empty());
        assert_eq!(updates(&registry, b), 1);
    }

    #[test]
    fn test_destroyed_entity_never_updated_again() {
        let mut registry = EntityRegistry::new();
        let a = registry.add(counter());
        let b = registry.add(counter());

        registry.run_update_pass(0.016, |registry, id, counter, _| {
            counter.updates += 1;
            if id == a {
                registry.get_mut(b).unwrap().destroy();
            }
        });

        // b was marked before its turn and is swept without an update
        assert!(!registry.contains(b));
        assert_eq!(updates(&registry, a), 1);
    }

    #[test]
    fn test_paused_entities_are_skipped() {
        let mut registry = EntityRegistry::new();
        let a = registry.add(counter().with_state(EntityState::Paused));

        let report = registry.run_update_pass(0.016, |_, _, counter, _| counter.updates += 1);
        assert_eq!(report.updated, 0);
        assert_eq!(updates(&registry, a), 0);
        assert!(registry.contains(a));
    }

    #[test]
    fn test_move_to_back() {
        let mut registry = EntityRegistry::new();
        let a = registry.add(counter());
        let b = registry.add(counter());
        let c = registry.add(counter());

        assert!(registry.move_to_back(a));
        assert_eq!(registry.live(), &[b, c, a]);

        registry.remove(b);
        assert!(!registry.move_to_back(b));
    }

    #[test]
    fn test_retain_removes_rejected() {
        let mut registry = EntityRegistry::new();
        let keep = registry.add(counter().with_level_id(1));
        registry.add(counter().in_category(Category::GROUND));
        registry.add(counter());

        let removed = registry.retain(|_, entity| entity.level_id == Some(1));
        assert_eq!(removed, 2);
        assert_eq!(registry.live(), &[keep]);
        assert!(registry.category(Category::GROUND).is_empty());
    }

    #[test]
    fn test_draw_list_sorted_and_filtered() {
        let mut registry = EntityRegistry::new();
        let back = registry.add(counter().with_drawable(Drawable::rect(Color::WHITE, 5)));
        let front = registry.add(counter().with_drawable(Drawable::rect(Color::WHITE, 1)));
        let tie = registry.add(counter().with_drawable(Drawable::rect(Color::BLACK, 5)));
        registry.add(counter().with_drawable(Drawable::sprite(None, 0)));
        registry.add(counter());

        assert_eq!(registry.draw_list(), vec![front, back, tie]);
    }
}
