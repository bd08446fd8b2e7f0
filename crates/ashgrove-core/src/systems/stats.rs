//! Derived-stat recalculation.
//!
//! | Derived                   | Formula                            |
//! |---------------------------|------------------------------------|
//! | `attack_power`            | `2 × strength + level`             |
//! | `defense_power`           | `vitality + dexterity / 2`         |
//! | `max_health_bonus`        | `5 × vitality + 2 × level`         |
//! | `max_mana_bonus`          | `5 × intelligence + level`         |
//! | `attack_speed`            | `max(1 + 0.02 × dexterity, floor)` |
//! | `movement_speed_modifier` | `1 + 0.01 × dexterity`             |

use tracing::debug;

use crate::entity::{Attributes, DerivedStats, EntityId, Experience, Health, Mana, Stats};
use crate::registry::Registry;
use crate::system::{System, TickContext, World};

/// Applies level-ups: attribute growth, recalculation, full heal.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsSystem;

impl System for StatsSystem {
    fn name(&self) -> &'static str {
        "stats"
    }

    fn run(&self, world: &mut World, _ctx: &TickContext<'_>) {
        let gain = world.config.attribute_gain_per_level;
        let min_attack_speed = world.config.min_attack_speed;
        for level_up in world.events.level_ups.drain() {
            let id = level_up.entity;
            if let Some(stats) = world.registry.get_mut::<Stats>(id) {
                stats.grow(gain);
            }
            if !recalculate_stats(&mut world.registry, id, min_attack_speed) {
                debug!(entity = %id, "level up without stats");
            }
            if let Some(health) = world.registry.get_mut::<Health>(id) {
                health.heal_full();
            }
            if let Some(mana) = world.registry.get_mut::<Mana>(id) {
                mana.refill();
            }
        }
    }
}

/// Pure derivation from attributes and level.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn derive_stats(base: &Attributes, level: u32, min_attack_speed: f32) -> DerivedStats {
    let signed = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
    let (strength, dexterity, intelligence, vitality, level) = (
        signed(base.strength),
        signed(base.dexterity),
        signed(base.intelligence),
        signed(base.vitality),
        signed(level),
    );
    DerivedStats {
        attack_power: strength.saturating_mul(2).saturating_add(level),
        defense_power: vitality.saturating_add(dexterity / 2),
        max_health_bonus: vitality
            .saturating_mul(5)
            .saturating_add(level.saturating_mul(2)),
        max_mana_bonus: intelligence.saturating_mul(5).saturating_add(level),
        attack_speed: (1.0 + base.dexterity as f32 * 0.02).max(min_attack_speed),
        movement_speed_modifier: 1.0 + base.dexterity as f32 * 0.01,
    }
}

/// Recomputes derived stats and pushes the pool bonuses into Health and Mana.
///
/// Entities without [`Experience`] count as level 1. Current health and mana
/// are clamped under their new maximum but not refilled. Returns false if
/// the entity has no [`Stats`].
#[allow(clippy::cast_precision_loss)]
pub fn recalculate_stats(registry: &mut Registry, id: EntityId, min_attack_speed: f32) -> bool {
    let level = registry.get::<Experience>(id).map_or(1, Experience::level);
    let Some(stats) = registry.get_mut::<Stats>(id) else {
        return false;
    };
    let derived = derive_stats(stats.base(), level, min_attack_speed);
    stats.set_derived(derived);

    if let Some(health) = registry.get_mut::<Health>(id) {
        let max = health.base() + derived.max_health_bonus as f32;
        health.set_max(max);
    }
    if let Some(mana) = registry.get_mut::<Mana>(id) {
        let max = mana.base() + derived.max_mana_bonus as f32;
        mana.set_max(max);
    }
    true
}
