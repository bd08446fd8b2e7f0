//! Attack resolution, death, and the defeat hand-off to experience.
//!
//! # Processing Order
//!
//! 1. Tick every attack cooldown, floored at zero
//! 2. Drain attack requests in FIFO order; each resolves at most once
//! 3. For each request, hit every living opposed target within range
//!
//! Targets are snapshotted once per tick. A target killed by an earlier
//! request in the same tick is skipped through its `Dead` marker.
//!
//! # Damage
//!
//! `attack.damage + attacker.attackPower - target.defensePower`, floored at
//! `min_damage`. Health clamps at zero; `Dead` is inserted exactly once.

use glam::Vec2;
use tracing::{debug, trace, warn};

use super::center_of;
use super::vfx::spawn_hit_burst;
use crate::entity::{
    Attack, DamageFlash, Dead, DecaySprites, EntityId, Faction, FactionFlags, Health, Lifetime,
    Participants, PlayerControl, Sprite, Stats, Velocity, XpReward,
};
use crate::events::{Defeated, Died, GameEvent};
use crate::store::ComponentKind;
use crate::system::{System, TickContext, World};

/// Cooldowns, hit detection, damage and the death transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatSystem;

impl System for CombatSystem {
    fn name(&self) -> &'static str {
        "combat"
    }

    fn run(&self, world: &mut World, ctx: &TickContext<'_>) {
        for id in world.registry.query(&[ComponentKind::Attack]) {
            if let Some(attack) = world.registry.get_mut::<Attack>(id) {
                attack.tick(ctx.dt);
            }
        }

        let requests = world.events.attacks.drain();
        if requests.is_empty() {
            return;
        }
        let candidates = world.registry.query(&[
            ComponentKind::Health,
            ComponentKind::Position,
            ComponentKind::Collider,
        ]);

        for request in requests {
            resolve_attack(world, request.attacker, &candidates);
        }
    }
}

fn resolve_attack(world: &mut World, attacker: EntityId, candidates: &[EntityId]) {
    if !world.registry.is_alive(attacker) {
        debug!(entity = %attacker, "attack dropped: attacker no longer exists");
        return;
    }
    if world.registry.has::<Dead>(attacker) {
        return;
    }
    let Some(attack) = world.registry.get::<Attack>(attacker).copied() else {
        warn!(entity = %attacker, "attack dropped: attacker has no attack component");
        return;
    };
    let Some(faction) = world.registry.get::<Faction>(attacker).map(|f| f.0) else {
        trace!(entity = %attacker, "attacker has no faction, nothing to hit");
        return;
    };
    let Some(origin) = center_of(&world.registry, attacker) else {
        return;
    };
    let attack_power = world
        .registry
        .get::<Stats>(attacker)
        .map_or(0, |s| s.derived().attack_power);
    let range_sq = attack.range * attack.range;

    let targets: Vec<(EntityId, Vec2)> = candidates
        .iter()
        .copied()
        .filter(|&id| id != attacker && world.registry.is_alive(id))
        .filter(|&id| !world.registry.has::<Dead>(id))
        .filter(|&id| is_valid_target(faction, world.registry.get::<Faction>(id)))
        .filter_map(|id| center_of(&world.registry, id).map(|c| (id, c)))
        .filter(|(_, center)| origin.distance_squared(*center) <= range_sq)
        .collect();

    for (target, center) in targets {
        let defense = world
            .registry
            .get::<Stats>(target)
            .map_or(0, |s| s.derived().defense_power);
        #[allow(clippy::cast_precision_loss)]
        let damage = (attack.damage + (attack_power - defense) as f32).max(world.config.min_damage);
        apply_hit(world, attacker, target, center, damage);
    }
}

/// Opposed factions only; untagged or dual-tagged targets never qualify.
fn is_valid_target(attacker: FactionFlags, target: Option<&Faction>) -> bool {
    target.is_some_and(|t| attacker.opposes(t.0))
}

fn apply_hit(world: &mut World, attacker: EntityId, target: EntityId, center: Vec2, damage: f32) {
    let Some(health) = world.registry.get_mut::<Health>(target) else {
        return;
    };
    let remaining = health.apply_damage(damage);
    let depleted = health.is_depleted();

    if let Some(participants) = world.registry.get_mut::<Participants>(target) {
        participants.record(attacker, damage);
    } else {
        let mut participants = Participants::default();
        participants.record(attacker, damage);
        world.registry.add(target, participants);
    }
    world
        .registry
        .add(target, DamageFlash::new(world.config.flash_duration));
    spawn_hit_burst(world, center);

    trace!(attacker = %attacker, target = %target, damage, remaining, "hit");
    world.events.emit(GameEvent::Hit {
        attacker,
        target,
        damage,
        remaining,
    });

    if depleted && !world.registry.has::<Dead>(target) {
        world.registry.add(target, Dead::default());
        if let Some(velocity) = world.registry.get_mut::<Velocity>(target) {
            *velocity = Velocity::ZERO;
        }
        debug!(entity = %target, killer = %attacker, "died");
        world.events.deaths.push(Died {
            entity: target,
            killer: attacker,
        });
        world.events.emit(GameEvent::Died {
            entity: target,
            killer: attacker,
        });
    }
}

/// Turns fresh corpses into experience payouts and starts their decay.
///
/// Player corpses keep no despawn timer; what happens after the player dies
/// is up to the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefeatSystem;

impl System for DefeatSystem {
    fn name(&self) -> &'static str {
        "defeat"
    }

    fn run(&self, world: &mut World, _ctx: &TickContext<'_>) {
        for died in world.events.deaths.drain() {
            let entity = died.entity;
            if !world.registry.is_alive(entity) {
                continue;
            }
            let participants = world
                .registry
                .get::<Participants>(entity)
                .map(Participants::snapshot)
                .unwrap_or_default();
            let xp = world.registry.get::<XpReward>(entity).map_or(0, |r| r.xp);
            world.events.defeats.push(Defeated {
                entity,
                participants,
                xp,
            });

            let is_player = world.registry.has::<PlayerControl>(entity)
                || world
                    .registry
                    .get::<Faction>(entity)
                    .is_some_and(|f| f.0.contains(FactionFlags::PLAYER));
            if !is_player {
                match Lifetime::new(world.config.corpse_lifetime) {
                    Ok(lifetime) => {
                        world.registry.add(entity, lifetime);
                    }
                    Err(err) => warn!(entity = %entity, %err, "corpse keeps no lifetime"),
                }
            }

            let first_stage = world
                .registry
                .get::<DecaySprites>(entity)
                .and_then(|d| d.stages.first().copied());
            let sprite = world.registry.get_mut::<Sprite>(entity);
            if let (Some(image), Some(sprite)) = (first_stage, sprite) {
                sprite.image = image;
            }
        }
    }
}
