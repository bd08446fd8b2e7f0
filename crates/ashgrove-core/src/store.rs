//! Typed table-per-kind component storage.
//!
//! Each component kind gets its own `BTreeMap<EntityId, T>`, so iteration over
//! any table is in ascending id order. The [`component_store!`] invocation at
//! the bottom of this file is the single list of kinds; adding a kind there
//! adds its table, its [`ComponentKind`] variant and its [`Component`] impl.

use std::collections::BTreeMap;
use std::fmt;

use crate::entity::{
    Animation, Attack, Collider, DamageFlash, Dead, DecaySprites, EntityId, Experience, Faction,
    Health, Interactable, Lifetime, Mana, Participants, Particle, PlayerControl, Position, Sprite,
    Stats, Velocity, Wander, XpReward,
};

/// A record type stored in its own registry table.
pub trait Component: Sized + 'static {
    /// Kind tag used in queries.
    const KIND: ComponentKind;

    /// The table holding every instance of this kind.
    fn table(store: &ComponentStore) -> &BTreeMap<EntityId, Self>;

    /// Mutable access to the table.
    fn table_mut(store: &mut ComponentStore) -> &mut BTreeMap<EntityId, Self>;
}

macro_rules! component_store {
    ($( $kind:ident => $field:ident : $ty:ty ),+ $(,)?) => {
        /// Tag naming one component kind, used to build queries.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ComponentKind {
            $(
                #[doc = concat!("[`", stringify!($ty), "`] records")]
                $kind,
            )+
        }

        impl ComponentKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [ComponentKind] = &[$(ComponentKind::$kind),+];

            /// Human-readable name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(ComponentKind::$kind => stringify!($kind),)+
                }
            }
        }

        /// One table per component kind.
        #[derive(Debug, Clone, Default)]
        pub struct ComponentStore {
            $($field: BTreeMap<EntityId, $ty>,)+
        }

        impl ComponentStore {
            /// Returns true if `id` has a record of `kind`.
            #[must_use]
            pub fn has_kind(&self, id: EntityId, kind: ComponentKind) -> bool {
                match kind {
                    $(ComponentKind::$kind => self.$field.contains_key(&id),)+
                }
            }

            /// Drops the record of `kind` for `id`. Returns true if one existed.
            pub fn remove_kind(&mut self, id: EntityId, kind: ComponentKind) -> bool {
                match kind {
                    $(ComponentKind::$kind => self.$field.remove(&id).is_some(),)+
                }
            }

            /// Drops every record belonging to `id`.
            pub fn remove_all(&mut self, id: EntityId) {
                $(self.$field.remove(&id);)+
            }

            /// Number of records of `kind`.
            #[must_use]
            pub fn len_of(&self, kind: ComponentKind) -> usize {
                match kind {
                    $(ComponentKind::$kind => self.$field.len(),)+
                }
            }

            /// Ids holding a record of `kind`, ascending.
            pub fn keys_of(&self, kind: ComponentKind) -> Box<dyn Iterator<Item = EntityId> + '_> {
                match kind {
                    $(ComponentKind::$kind => Box::new(self.$field.keys().copied()),)+
                }
            }
        }

        $(
            impl Component for $ty {
                const KIND: ComponentKind = ComponentKind::$kind;

                fn table(store: &ComponentStore) -> &BTreeMap<EntityId, Self> {
                    &store.$field
                }

                fn table_mut(store: &mut ComponentStore) -> &mut BTreeMap<EntityId, Self> {
                    &mut store.$field
                }
            }
        )+
    };
}

component_store! {
    Position => positions: Position,
    Velocity => velocities: Velocity,
    Collider => colliders: Collider,
    Health => healths: Health,
    Mana => manas: Mana,
    Stats => stats: Stats,
    Experience => experiences: Experience,
    Attack => attacks: Attack,
    Participants => participants: Participants,
    XpReward => xp_rewards: XpReward,
    Animation => animations: Animation,
    Wander => wanderers: Wander,
    Lifetime => lifetimes: Lifetime,
    Dead => dead: Dead,
    Sprite => sprites: Sprite,
    DecaySprites => decay_sprites: DecaySprites,
    DamageFlash => flashes: DamageFlash,
    Particle => particles: Particle,
    Faction => factions: Faction,
    PlayerControl => player_controls: PlayerControl,
    Interactable => interactables: Interactable,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
