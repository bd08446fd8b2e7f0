//! Gameplay systems, run once per tick in a fixed order.
//!
//! # Order
//!
//! | # | System        | Reads                         | Writes                          |
//! |---|---------------|-------------------------------|---------------------------------|
//! | 1 | input         | input sample                  | player velocity, attack queue   |
//! | 2 | interaction   | interaction queue             | outbound log                    |
//! | 3 | ai            | wander state                  | velocity, position (arrival)    |
//! | 4 | collision     | level, collider               | velocity                        |
//! | 5 | movement      | velocity                      | position                        |
//! | 6 | combat        | attack queue                  | health, dead, participants      |
//! | 7 | defeat        | death queue                   | defeat queue, corpse lifetime   |
//! | 8 | experience    | defeat queue                  | experience, level-up queue      |
//! | 9 | stats         | level-up queue                | derived stats, health, mana     |
//! |10 | animation     | velocity                      | animation, sprite image         |
//! |11 | flash         | damage flash                  | sprite visibility               |
//! |12 | particles     | particle                      | particle                        |
//! |13 | lifetime      | lifetime                      | destroys entities               |
//! |14 | decay         | dead, lifetime                | decay stage, sprite image       |
//! |15 | camera        | player position               | camera                          |

mod ai;
mod animation;
mod camera;
mod collision;
mod combat;
mod experience;
mod input;
mod interaction;
mod lifetime;
mod movement;
mod stats;
mod vfx;

pub use ai::{step_wander, WanderSystem};
pub use animation::AnimationSystem;
pub use camera::CameraSystem;
pub use collision::{resolve_velocity, CollisionSystem};
pub use combat::{CombatSystem, DefeatSystem};
pub use experience::{xp_shares, ExperienceSystem};
pub use input::InputSystem;
pub use interaction::InteractionSystem;
pub use lifetime::{DecaySystem, LifetimeSystem};
pub use movement::MovementSystem;
pub use stats::{derive_stats, recalculate_stats, StatsSystem};
pub use vfx::{FlashSystem, ParticleSystem};

use glam::Vec2;
use tracing::debug;

use crate::assets::FrameProvider;
use crate::entity::{Animation, Attack, Collider, EntityId, Position, Stats, Velocity};
use crate::events::{AttackRequested, GameEvent};
use crate::registry::Registry;
use crate::system::{System, World};

/// The full system list in tick order.
#[must_use]
pub fn default_systems() -> Vec<Box<dyn System>> {
    vec![
        Box::new(InputSystem),
        Box::new(InteractionSystem),
        Box::new(WanderSystem),
        Box::new(CollisionSystem),
        Box::new(MovementSystem),
        Box::new(CombatSystem),
        Box::new(DefeatSystem),
        Box::new(ExperienceSystem),
        Box::new(StatsSystem),
        Box::new(AnimationSystem),
        Box::new(FlashSystem),
        Box::new(ParticleSystem),
        Box::new(LifetimeSystem),
        Box::new(DecaySystem),
        Box::new(CameraSystem),
    ]
}

/// Hitbox center, or the position itself for entities without a collider.
pub(crate) fn center_of(registry: &Registry, id: EntityId) -> Option<Vec2> {
    let position = *registry.get::<Position>(id)?;
    Some(match registry.get::<Collider>(id) {
        Some(collider) => collider.hitbox(position).center(),
        None => position.as_ivec2().as_vec2(),
    })
}

/// Rounds a per-tick displacement to whole pixels.
///
/// A nonzero displacement never rounds to zero; it moves at least one pixel
/// in its direction.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn whole_pixels(value: f32) -> i32 {
    let rounded = value.round() as i32;
    if rounded == 0 && value != 0.0 {
        if value > 0.0 {
            1
        } else {
            -1
        }
    } else {
        rounded
    }
}

/// Starts an attack if the cooldown allows it.
///
/// Entities with an [`Animation`] need frames for their weapon and facing;
/// without them the attack is aborted and the cooldown is left untouched.
/// Returns true if an attack request was queued.
pub(crate) fn try_begin_attack(
    world: &mut World,
    frames: &dyn FrameProvider,
    id: EntityId,
) -> bool {
    let Some(attack) = world.registry.get::<Attack>(id).copied() else {
        return false;
    };
    if !attack.is_ready() {
        return false;
    }
    let velocity = world.registry.get::<Velocity>(id).copied();
    if let Some(animation) = world.registry.get_mut::<Animation>(id) {
        // Swing toward this tick's heading, not last tick's.
        if let Some(velocity) = velocity {
            animation.face(velocity);
        }
        let started = frames.attack_frames(attack.weapon).is_some_and(|set| {
            animation.start_attack(
                &set.frames,
                &set.hitboxes,
                set.frame_duration,
                set.total_frames,
            )
        });
        if !started {
            debug!(entity = %id, weapon = ?attack.weapon, "attack aborted: no frames for facing");
            world.events.emit(GameEvent::AttackAborted { entity: id });
            return false;
        }
    }
    let attack_speed = world
        .registry
        .get::<Stats>(id)
        .map_or(1.0, |stats| stats.derived().attack_speed);
    if let Some(attack) = world.registry.get_mut::<Attack>(id) {
        attack.trigger(attack_speed);
    }
    world.events.attacks.push(AttackRequested { attacker: id });
    true
}
