//! Entity identifiers and the component records attached to them.
//!
//! - [`EntityId`]: opaque, monotonically allocated identifier
//! - [`FactionFlags`]: player/enemy tags used by combat targeting
//! - [`components`]: plain data records, one per component kind
//! - [`animation`]: the locomotion/attack animation component
//!
//! Entities own nothing themselves; the [`Registry`](crate::registry::Registry)
//! associates records with ids through one table per component kind.

pub mod animation;
pub mod components;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use animation::{Animation, AttackState, Direction};
pub use components::{
    Attack, Attributes, Collider, DamageFlash, Dead, DecaySprites, DerivedStats, Experience,
    Faction, Health, Interactable, Lifetime, Mana, Participants, Particle, PlayerControl,
    Position, Sprite, Stats, Velocity, Wander, WanderState, XpReward,
};

/// Unique identifier for an entity.
///
/// Ids are allocated monotonically by the registry and never reused, so an id
/// held after its entity was destroyed can only ever miss.
///
/// # Ordering
///
/// Ids order by allocation, which is the order every registry query returns.
///
/// # Example
///
/// ```
/// use ashgrove_core::entity::EntityId;
///
/// let first = EntityId::new(1);
/// let second = EntityId::new(2);
///
/// assert!(first < second);
/// assert_eq!(first.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates an `EntityId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

bitflags! {
    /// Faction tags carried by the [`Faction`] component.
    ///
    /// Combat only pairs an attacker and a target whose tags are exactly
    /// `PLAYER` against exactly `ENEMY`. An entity tagged with neither or both
    /// is never a valid target and never finds one.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FactionFlags: u8 {
        /// Controlled by (or allied with) the player
        const PLAYER = 0b01;
        /// Hostile to the player
        const ENEMY = 0b10;
    }
}

impl FactionFlags {
    /// Returns true if an entity tagged `self` may hit one tagged `other`.
    #[must_use]
    pub fn opposes(self, other: Self) -> bool {
        (self == Self::PLAYER && other == Self::ENEMY)
            || (self == Self::ENEMY && other == Self::PLAYER)
    }
}
