//! Damage-weighted experience distribution.
//!
//! Each contributor's share is `max(1, round(xp × damage / total))`, so the
//! shares may sum to slightly more than the reward, and anyone who dealt
//! positive damage gets at least one point.

use tracing::{debug, trace};

use crate::entity::{EntityId, Experience, Participants};
use crate::events::{GameEvent, LevelUp};
use crate::system::{System, TickContext, World};

/// Pays out defeated entities' experience to their attackers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExperienceSystem;

impl System for ExperienceSystem {
    fn name(&self) -> &'static str {
        "experience"
    }

    fn run(&self, world: &mut World, _ctx: &TickContext<'_>) {
        for defeat in world.events.defeats.drain() {
            let Some(shares) = xp_shares(&defeat.participants, defeat.xp) else {
                debug!(
                    entity = %defeat.entity,
                    xp = defeat.xp,
                    contributors = defeat.participants.len(),
                    "no experience to distribute"
                );
                world.registry.remove::<Participants>(defeat.entity);
                continue;
            };

            for (contributor, share) in shares {
                let Some(experience) = world.registry.get_mut::<Experience>(contributor) else {
                    trace!(entity = %contributor, "contributor cannot gain experience");
                    continue;
                };
                let gained = experience.grant(share, &world.config.level_curve);
                let reached = experience.level();
                trace!(entity = %contributor, share, "experience granted");
                for level in (reached - gained + 1)..=reached {
                    debug!(entity = %contributor, level, "level up");
                    world.events.level_ups.push(LevelUp {
                        entity: contributor,
                        level,
                    });
                    world.events.emit(GameEvent::LevelUp {
                        entity: contributor,
                        level,
                    });
                }
            }
            world.registry.remove::<Participants>(defeat.entity);
        }
    }
}

/// Splits `xp` among contributors by damage dealt.
///
/// Returns `None` when there is nothing to split: no contributors, no
/// experience, or no positive damage. Contributors with non-positive damage
/// are left out.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn xp_shares(participants: &[(EntityId, f32)], xp: u64) -> Option<Vec<(EntityId, u64)>> {
    let total: f64 = participants
        .iter()
        .filter(|(_, damage)| *damage > 0.0)
        .map(|(_, damage)| f64::from(*damage))
        .sum();
    if participants.is_empty() || xp == 0 || total <= 0.0 {
        return None;
    }
    let shares = participants
        .iter()
        .filter(|(_, damage)| *damage > 0.0)
        .map(|&(id, damage)| {
            let share = (xp as f64 * f64::from(damage) / total).round() as u64;
            (id, share.max(1))
        })
        .collect();
    Some(shares)
}
