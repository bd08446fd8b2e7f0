//! Wandering state machine and enemy aggression.
//!
//! ```text
//!            idle timer <= 0: pick target
//!   IDLE ───────────────────────────────▶ WANDERING
//!     ▲                                       │
//!     └───────────────────────────────────────┘
//!        arrived: snap to target, new idle timer
//! ```
//!
//! Targets are picked with a uniform angle and a uniform radial distance,
//! then truncated towards the origin, so they always lie in the wander
//! circle. A step is only taken if every point it could end on after
//! collision clamping stays in the circle; otherwise a single-axis step is
//! tried, and failing that the entity arrives immediately.

use std::f32::consts::TAU;

use glam::{IVec2, Vec2};
use rand::Rng;
use tracing::{debug, trace};

use super::{center_of, try_begin_attack, whole_pixels};
use crate::entity::{
    Attack, Dead, EntityId, Faction, FactionFlags, Position, Velocity, Wander, WanderState,
};
use crate::store::ComponentKind;
use crate::system::{System, TickContext, World};

/// Drives [`Wander`] entities and lets armed enemies attack nearby players.
#[derive(Debug, Clone, Copy, Default)]
pub struct WanderSystem;

impl System for WanderSystem {
    fn name(&self) -> &'static str {
        "ai"
    }

    fn run(&self, world: &mut World, ctx: &TickContext<'_>) {
        let multiplier = world.config.wander_arrival_multiplier;
        let wanderers = world.registry.query(&[
            ComponentKind::Wander,
            ComponentKind::Position,
            ComponentKind::Velocity,
        ]);

        for id in wanderers {
            if world.registry.has::<Dead>(id) {
                continue;
            }
            let (Some(mut wander), Some(mut position)) = (
                world.registry.get::<Wander>(id).copied(),
                world.registry.get::<Position>(id).copied(),
            ) else {
                continue;
            };
            let before = wander.state();
            let velocity = step_wander(
                &mut wander,
                &mut position,
                ctx.dt,
                multiplier,
                &mut world.rng,
            );
            if wander.state() != before {
                debug!(
                    entity = %id,
                    state = ?wander.state(),
                    target_x = wander.target().x,
                    target_y = wander.target().y,
                    "wander state changed"
                );
            }
            world.registry.add(id, wander);
            world.registry.add(id, position);
            world.registry.add(id, velocity);
        }

        aggression(world, ctx);
    }
}

/// Advances one wanderer by one tick and returns its velocity intent.
///
/// `position` is only written when the wanderer arrives and snaps onto its
/// target. `dt` is the tick length in seconds.
pub fn step_wander<R: Rng + ?Sized>(
    wander: &mut Wander,
    position: &mut Position,
    dt: f32,
    arrival_multiplier: f32,
    rng: &mut R,
) -> Velocity {
    match wander.state {
        WanderState::Idle => {
            wander.idle_timer -= dt;
            if wander.idle_timer <= 0.0 {
                wander.target = pick_target(wander, rng);
                wander.state = WanderState::Wandering;
            }
            Velocity::ZERO
        }
        WanderState::Wandering => {
            let here = position.as_ivec2();
            let delta = wander.target - here;
            let distance = delta.as_vec2().length();
            let threshold = wander.speed() * dt * arrival_multiplier;
            if distance == 0.0 || distance < threshold {
                arrive(wander, position, rng);
                return Velocity::ZERO;
            }

            let raw = delta.as_vec2() / distance * wander.speed() * dt;
            let step = IVec2::new(clamp_axis(raw.x, delta.x), clamp_axis(raw.y, delta.y));
            let candidates = [step, IVec2::new(step.x, 0), IVec2::new(0, step.y)];
            let fits = |s: IVec2| {
                s != IVec2::ZERO
                    && wander.contains(here + s)
                    && wander.contains(here + IVec2::new(s.x, 0))
                    && wander.contains(here + IVec2::new(0, s.y))
            };
            match candidates.into_iter().find(|s| fits(*s)) {
                Some(s) => Velocity::new(s.x, s.y),
                None => {
                    trace!("wander step would leave circle, arriving early");
                    arrive(wander, position, rng);
                    Velocity::ZERO
                }
            }
        }
    }
}

/// Rounds one axis of a step without overshooting the remaining distance.
fn clamp_axis(raw: f32, remaining: i32) -> i32 {
    if remaining == 0 {
        return 0;
    }
    let step = whole_pixels(raw);
    step.clamp(-remaining.abs(), remaining.abs())
}

#[allow(clippy::cast_possible_truncation)]
fn pick_target<R: Rng + ?Sized>(wander: &Wander, rng: &mut R) -> IVec2 {
    let angle = rng.gen_range(0.0..TAU);
    let distance = if wander.radius() > 0.0 {
        rng.gen_range(0.0..=wander.radius())
    } else {
        0.0
    };
    let offset = Vec2::from_angle(angle) * distance;
    wander.origin() + IVec2::new(offset.x.trunc() as i32, offset.y.trunc() as i32)
}

fn arrive<R: Rng + ?Sized>(wander: &mut Wander, position: &mut Position, rng: &mut R) {
    *position = Position::from(wander.target);
    let (min_idle, max_idle) = wander.idle_bounds();
    wander.idle_timer = if max_idle > min_idle {
        rng.gen_range(min_idle..=max_idle)
    } else {
        min_idle
    };
    wander.state = WanderState::Idle;
}

/// Armed enemies swing at living players within reach.
fn aggression(world: &mut World, ctx: &TickContext<'_>) {
    let attackers = world.registry.query(&[
        ComponentKind::Wander,
        ComponentKind::Attack,
        ComponentKind::Faction,
        ComponentKind::Position,
    ]);
    if attackers.is_empty() {
        return;
    }
    let players: Vec<(EntityId, Vec2)> = world
        .registry
        .query(&[
            ComponentKind::PlayerControl,
            ComponentKind::Faction,
            ComponentKind::Position,
        ])
        .into_iter()
        .filter(|id| !world.registry.has::<Dead>(*id))
        .filter(|id| {
            world
                .registry
                .get::<Faction>(*id)
                .is_some_and(|f| f.0 == FactionFlags::PLAYER)
        })
        .filter_map(|id| center_of(&world.registry, id).map(|c| (id, c)))
        .collect();

    for id in attackers {
        if world.registry.has::<Dead>(id) {
            continue;
        }
        let Some(faction) = world.registry.get::<Faction>(id).copied() else {
            continue;
        };
        if faction.0 != FactionFlags::ENEMY {
            continue;
        }
        let Some(attack) = world.registry.get::<Attack>(id).copied() else {
            continue;
        };
        if !attack.is_ready() {
            continue;
        }
        let Some(center) = center_of(&world.registry, id) else {
            continue;
        };
        let range_sq = attack.range * attack.range;
        if let Some((target, _)) = players
            .iter()
            .find(|(_, c)| center.distance_squared(*c) <= range_sq)
        {
            if try_begin_attack(world, ctx.frames, id) {
                debug!(entity = %id, target = %target, "enemy attacks");
            }
        }
    }
}
