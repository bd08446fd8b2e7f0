//! Entity registry: lifecycle plus the component store.
//!
//! The registry is the single shared mutable resource of the simulation. It
//! provides:
//! - Monotonic id allocation (ids are never reused)
//! - Atomic destruction (all components vanish in one call)
//! - Typed `add`/`get`/`remove` per component kind
//! - Set-membership queries returning ids in ascending order
//!
//! # Invalid references
//!
//! Operating on an unknown id is never an error. `add` logs a warning and
//! returns `false`, `destroy` logs at debug level and returns `false`, and
//! lookups return `None`.
//!
//! # Mutating while iterating
//!
//! [`Registry::query`] returns an owned `Vec`, a snapshot. Systems that
//! destroy entities or remove components collect ids first and mutate in a
//! second pass.
//!
//! # Example
//!
//! ```
//! use ashgrove_core::entity::{Position, Velocity};
//! use ashgrove_core::registry::Registry;
//! use ashgrove_core::store::ComponentKind;
//!
//! let mut registry = Registry::new();
//! let a = registry.create();
//! let b = registry.create();
//! registry.add(a, Position::new(0, 0));
//! registry.add(a, Velocity::new(1, 0));
//! registry.add(b, Position::new(5, 5));
//!
//! let movers = registry.query(&[ComponentKind::Position, ComponentKind::Velocity]);
//! assert_eq!(movers, vec![a]);
//! assert_eq!(registry.query(&[]), vec![a, b]);
//! ```

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::entity::EntityId;
use crate::store::{Component, ComponentKind, ComponentStore};

/// Owns every live entity and its components.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Next id to hand out.
    next_id: u64,
    /// Live entities, ascending.
    alive: BTreeSet<EntityId>,
    store: ComponentStore,
}

impl Registry {
    /// Creates an empty registry. The first id allocated is 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh entity with no components.
    pub fn create(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.alive.insert(id);
        id
    }

    /// Destroys an entity and all its components.
    ///
    /// Returns false (and logs) if the id is unknown or already destroyed.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        if !self.alive.remove(&id) {
            debug!(entity = %id, "destroy: entity not found");
            return false;
        }
        self.store.remove_all(id);
        true
    }

    /// Returns true if `id` is live.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.alive.contains(&id)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alive.len()
    }

    /// Returns true if no entity is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Live ids in ascending order.
    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.alive.iter().copied()
    }

    /// Attaches a component, replacing any existing one of the same kind.
    ///
    /// Returns false (and logs a warning) if `id` is not live.
    pub fn add<T: Component>(&mut self, id: EntityId, component: T) -> bool {
        if !self.is_alive(id) {
            warn!(entity = %id, kind = %T::KIND, "add: entity not found");
            return false;
        }
        T::table_mut(&mut self.store).insert(id, component);
        true
    }

    /// Detaches and returns a component. No-op if absent.
    pub fn remove<T: Component>(&mut self, id: EntityId) -> Option<T> {
        T::table_mut(&mut self.store).remove(&id)
    }

    /// Detaches a component by kind tag. Returns true if one was present.
    pub fn remove_kind(&mut self, id: EntityId, kind: ComponentKind) -> bool {
        self.store.remove_kind(id, kind)
    }

    /// Looks up a component.
    #[must_use]
    pub fn get<T: Component>(&self, id: EntityId) -> Option<&T> {
        T::table(&self.store).get(&id)
    }

    /// Looks up a component for mutation.
    #[must_use]
    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        T::table_mut(&mut self.store).get_mut(&id)
    }

    /// Returns true if `id` has a component of type `T`.
    #[must_use]
    pub fn has<T: Component>(&self, id: EntityId) -> bool {
        T::table(&self.store).contains_key(&id)
    }

    /// Returns true if `id` has a component of `kind`.
    #[must_use]
    pub fn has_kind(&self, id: EntityId, kind: ComponentKind) -> bool {
        self.store.has_kind(id, kind)
    }

    /// Ids having every listed kind, ascending.
    ///
    /// An empty list returns every live entity. The smallest requested table
    /// drives the scan.
    #[must_use]
    pub fn query(&self, kinds: &[ComponentKind]) -> Vec<EntityId> {
        let Some(driver) = kinds.iter().copied().min_by_key(|k| self.store.len_of(*k)) else {
            return self.alive.iter().copied().collect();
        };
        self.store
            .keys_of(driver)
            .filter(|id| kinds.iter().all(|k| *k == driver || self.store.has_kind(*id, *k)))
            .collect()
    }

    /// First id (lowest) having every listed kind.
    ///
    /// Only meaningful when at most one match is expected, such as the player.
    #[must_use]
    pub fn first_matching(&self, kinds: &[ComponentKind]) -> Option<EntityId> {
        self.query(kinds).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Dead, Health, Position, Velocity};
    use proptest::prelude::*;

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn ids_are_sequential_and_never_reused() {
            let mut registry = Registry::new();
            let a = registry.create();
            let b = registry.create();
            assert_eq!(a, EntityId::new(0));
            assert_eq!(b, EntityId::new(1));

            assert!(registry.destroy(a));
            let c = registry.create();
            assert_eq!(c, EntityId::new(2));
            assert_eq!(registry.len(), 2);
        }

        #[test]
        fn destroy_unknown_is_reported_not_fatal() {
            let mut registry = Registry::new();
            assert!(!registry.destroy(EntityId::new(42)));
            let id = registry.create();
            assert!(registry.destroy(id));
            assert!(!registry.destroy(id));
        }

        #[test]
        fn destroy_removes_every_component() {
            let mut registry = Registry::new();
            let id = registry.create();
            registry.add(id, Position::new(1, 1));
            registry.add(id, Dead::default());

            registry.destroy(id);

            assert!(registry.get::<Position>(id).is_none());
            assert!(registry.query(&[ComponentKind::Dead]).is_empty());
            assert!(!registry.is_alive(id));
        }
    }

    mod component_tests {
        use super::*;

        #[test]
        fn add_to_unknown_entity_fails() {
            let mut registry = Registry::new();
            assert!(!registry.add(EntityId::new(7), Position::new(0, 0)));
            assert!(registry.query(&[ComponentKind::Position]).is_empty());
        }

        #[test]
        fn add_replaces_same_kind() {
            let mut registry = Registry::new();
            let id = registry.create();
            registry.add(id, Position::new(1, 1));
            registry.add(id, Position::new(9, 9));
            assert_eq!(registry.get::<Position>(id), Some(&Position::new(9, 9)));
        }

        #[test]
        fn remove_absent_is_noop() {
            let mut registry = Registry::new();
            let id = registry.create();
            assert!(registry.remove::<Velocity>(id).is_none());
            assert!(!registry.remove_kind(id, ComponentKind::Velocity));
        }

        #[test]
        fn get_mut_persists_changes() {
            let mut registry = Registry::new();
            let id = registry.create();
            registry.add(id, Health::new(20.0).unwrap());
            if let Some(health) = registry.get_mut::<Health>(id) {
                health.apply_damage(5.0);
            }
            assert_eq!(registry.get::<Health>(id).map(Health::current), Some(15.0));
            assert!(registry.has::<Health>(id));
            assert!(registry.has_kind(id, ComponentKind::Health));
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn empty_query_returns_all_live_entities() {
            let mut registry = Registry::new();
            let a = registry.create();
            let b = registry.create();
            let c = registry.create();
            registry.destroy(b);
            assert_eq!(registry.query(&[]), vec![a, c]);
        }

        #[test]
        fn first_matching_picks_lowest_id() {
            let mut registry = Registry::new();
            let _bare = registry.create();
            let a = registry.create();
            let b = registry.create();
            registry.add(b, Dead::default());
            registry.add(a, Dead::default());
            assert_eq!(registry.first_matching(&[ComponentKind::Dead]), Some(a));
            assert_eq!(registry.first_matching(&[ComponentKind::Velocity]), None);
        }
    }

    proptest! {
        #[test]
        fn query_matches_brute_force(
            layout in proptest::collection::vec(
                (any::<bool>(), any::<bool>(), any::<bool>()),
                0..40,
            )
        ) {
            let mut registry = Registry::new();
            let mut expected = Vec::new();
            for (has_pos, has_vel, destroyed) in &layout {
                let id = registry.create();
                if *has_pos {
                    registry.add(id, Position::new(0, 0));
                }
                if *has_vel {
                    registry.add(id, Velocity::ZERO);
                }
                if *destroyed {
                    registry.destroy(id);
                } else if *has_pos && *has_vel {
                    expected.push(id);
                }
            }
            let found = registry.query(&[ComponentKind::Velocity, ComponentKind::Position]);
            prop_assert_eq!(found, expected);
        }
    }
}
