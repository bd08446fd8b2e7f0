//! Despawn timers and corpse decomposition.

use tracing::{debug, trace};

use crate::entity::{Dead, DecaySprites, Lifetime, Particle, Sprite};
use crate::events::GameEvent;
use crate::store::ComponentKind;
use crate::system::{System, TickContext, World};

/// Destroys entities whose lifetime has run out.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifetimeSystem;

impl System for LifetimeSystem {
    fn name(&self) -> &'static str {
        "lifetime"
    }

    fn run(&self, world: &mut World, ctx: &TickContext<'_>) {
        let mut expired = Vec::new();
        for id in world.registry.query(&[ComponentKind::Lifetime]) {
            if let Some(lifetime) = world.registry.get_mut::<Lifetime>(id) {
                if lifetime.tick(ctx.dt) {
                    expired.push(id);
                }
            }
        }
        for id in expired {
            let particle = world.registry.has::<Particle>(id);
            if world.registry.destroy(id) && !particle {
                debug!(entity = %id, "despawned");
                world.events.emit(GameEvent::Despawned { entity: id });
            }
        }
    }
}

/// Steps corpses through their decay images as their lifetime runs down.
///
/// With `N` stages the stage is `min(floor(progress × N), N − 1)`, where `N`
/// is the number of decay images or the configured stage count when the
/// corpse has none. Stages never go backwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecaySystem;

impl System for DecaySystem {
    fn name(&self) -> &'static str {
        "decay"
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn run(&self, world: &mut World, _ctx: &TickContext<'_>) {
        for id in world
            .registry
            .query(&[ComponentKind::Dead, ComponentKind::Lifetime])
        {
            let Some(progress) = world.registry.get::<Lifetime>(id).map(Lifetime::progress) else {
                continue;
            };
            let images = world
                .registry
                .get::<DecaySprites>(id)
                .map(|d| d.stages.clone())
                .unwrap_or_default();
            let stages = if images.is_empty() {
                world.config.decay_stages
            } else {
                u32::try_from(images.len()).unwrap_or(u32::MAX)
            };
            let stage = ((progress * stages as f32).floor() as u32).min(stages - 1);

            let Some(dead) = world.registry.get_mut::<Dead>(id) else {
                continue;
            };
            if stage <= dead.decay_stage {
                continue;
            }
            dead.decay_stage = stage;
            trace!(entity = %id, stage, "decay stage");

            let image = images.get(stage as usize).copied();
            if let (Some(image), Some(sprite)) = (image, world.registry.get_mut::<Sprite>(id)) {
                sprite.image = image;
            }
        }
    }
}
