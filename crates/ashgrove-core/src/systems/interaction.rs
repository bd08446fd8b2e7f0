use tracing::{debug, trace};

use super::center_of;
use crate::entity::{EntityId, Interactable};
use crate::events::GameEvent;
use crate::store::ComponentKind;
use crate::system::{System, TickContext, World};

/// Resolves interaction attempts against the nearest reachable [`Interactable`].
///
/// An interactable is reachable when the actor's center lies within its
/// radius of the interactable's center. Ties go to the lower id.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionSystem;

impl System for InteractionSystem {
    fn name(&self) -> &'static str {
        "interaction"
    }

    fn run(&self, world: &mut World, _ctx: &TickContext<'_>) {
        let attempts = world.events.interactions.drain();
        if attempts.is_empty() {
            return;
        }
        let candidates = world
            .registry
            .query(&[ComponentKind::Interactable, ComponentKind::Position]);

        for attempt in attempts {
            let actor = attempt.actor;
            let Some(origin) = center_of(&world.registry, actor) else {
                debug!(entity = %actor, "interaction: actor has no position");
                continue;
            };

            let mut nearest: Option<(EntityId, f32)> = None;
            for &target in &candidates {
                if target == actor {
                    continue;
                }
                let (Some(center), Some(interactable)) = (
                    center_of(&world.registry, target),
                    world.registry.get::<Interactable>(target),
                ) else {
                    continue;
                };
                let distance_sq = origin.distance_squared(center);
                if distance_sq > interactable.radius * interactable.radius {
                    continue;
                }
                if nearest.map_or(true, |(_, best)| distance_sq < best) {
                    nearest = Some((target, distance_sq));
                }
            }

            match nearest {
                Some((target, _)) => {
                    let label = world
                        .registry
                        .get::<Interactable>(target)
                        .map(|i| i.label.clone())
                        .unwrap_or_default();
                    debug!(entity = %actor, target = %target, label = %label, "interacted");
                    world.events.emit(GameEvent::Interacted {
                        actor,
                        target,
                        label,
                    });
                }
                None => trace!(entity = %actor, "nothing to interact with"),
            }
        }
    }
}
