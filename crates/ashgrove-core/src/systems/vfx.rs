//! Purely visual effects: the took-damage flicker and hit-burst particles.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use tracing::{trace, warn};

use crate::entity::{DamageFlash, Lifetime, Particle, Sprite};
use crate::store::ComponentKind;
use crate::system::{System, TickContext, World};

/// Counts flicker timers down and toggles sprite visibility per segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlashSystem;

impl System for FlashSystem {
    fn name(&self) -> &'static str {
        "flash"
    }

    fn run(&self, world: &mut World, ctx: &TickContext<'_>) {
        let segment = world.config.flash_segment;
        let mut expired = Vec::new();
        for id in world.registry.query(&[ComponentKind::DamageFlash]) {
            let Some(flash) = world.registry.get_mut::<DamageFlash>(id) else {
                continue;
            };
            let done = flash.tick(ctx.dt);
            let visible = done || flash.visible(segment);
            if let Some(sprite) = world.registry.get_mut::<Sprite>(id) {
                sprite.visible = visible;
            }
            if done {
                expired.push(id);
            }
        }
        for id in expired {
            world.registry.remove::<DamageFlash>(id);
        }
    }
}

/// Integrates particle drift and bounce.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParticleSystem;

impl System for ParticleSystem {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn run(&self, world: &mut World, ctx: &TickContext<'_>) {
        let tuning = world.config.particles;
        for id in world.registry.query(&[ComponentKind::Particle]) {
            if let Some(particle) = world.registry.get_mut::<Particle>(id) {
                particle.step(ctx.dt, tuning.gravity, tuning.restitution);
            }
        }
    }
}

/// Spawns a burst of short-lived particles at `at`.
pub(crate) fn spawn_hit_burst(world: &mut World, at: Vec2) {
    let tuning = world.config.particles;
    let lifetime = match Lifetime::new(tuning.lifetime) {
        Ok(lifetime) => lifetime,
        Err(error) => {
            warn!(%error, "hit burst skipped");
            return;
        }
    };
    for _ in 0..tuning.count {
        let angle = world.rng.gen_range(0.0..TAU);
        let speed = world.rng.gen_range(0.0..=tuning.speed.max(0.0));
        let id = world.registry.create();
        world.registry.add(
            id,
            Particle {
                position: at,
                drift: Vec2::from_angle(angle) * speed,
                height: 0.0,
                vertical_speed: tuning.lift,
                size: tuning.size,
                color: tuning.color,
            },
        );
        world.registry.add(id, lifetime);
    }
    trace!(count = tuning.count, x = at.x, y = at.y, "hit burst");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageId;
    use crate::system::InputState;
    use crate::tests::helpers::{run_system, test_world};

    mod flash_tests {
        use super::*;

        #[test]
        fn flicker_hides_then_restores_sprite() {
            let mut world = test_world();
            let id = world.registry.create();
            world.registry.add(id, Sprite::new(ImageId::new(1), 8, 8));
            world.registry.add(id, DamageFlash::new(world.config.flash_duration));

            run_system(&FlashSystem, &mut world, &InputState::default());
            // First segment is hidden.
            assert_eq!(world.registry.get::<Sprite>(id).map(|s| s.visible), Some(false));

            let mut saw_visible = false;
            for _ in 0..60 {
                run_system(&FlashSystem, &mut world, &InputState::default());
                if world.registry.has::<DamageFlash>(id) {
                    saw_visible |= world.registry.get::<Sprite>(id).is_some_and(|s| s.visible);
                }
            }
            assert!(saw_visible, "flicker never showed the sprite");
            assert!(!world.registry.has::<DamageFlash>(id));
            assert_eq!(world.registry.get::<Sprite>(id).map(|s| s.visible), Some(true));
        }

        #[test]
        fn flash_without_sprite_still_expires() {
            let mut world = test_world();
            let id = world.registry.create();
            world.registry.add(id, DamageFlash::new(0.01));
            run_system(&FlashSystem, &mut world, &InputState::default());
            assert!(!world.registry.has::<DamageFlash>(id));
        }
    }

    mod particle_tests {
        use super::*;

        #[test]
        fn burst_spawns_configured_count() {
            let mut world = test_world();
            world.config.particles.count = 5;
            spawn_hit_burst(&mut world, Vec2::new(40.0, 40.0));

            let particles = world
                .registry
                .query(&[ComponentKind::Particle, ComponentKind::Lifetime]);
            assert_eq!(particles.len(), 5);
            for id in particles {
                let particle = world.registry.get::<Particle>(id).unwrap();
                assert_eq!(particle.position, Vec2::new(40.0, 40.0));
                assert!(particle.drift.length() <= world.config.particles.speed + 1e-3);
            }
        }

        #[test]
        fn particles_rise_then_settle() {
            let mut world = test_world();
            world.config.particles.count = 1;
            spawn_hit_burst(&mut world, Vec2::ZERO);
            let id = world.registry.query(&[ComponentKind::Particle])[0];

            run_system(&ParticleSystem, &mut world, &InputState::default());
            let height = world.registry.get::<Particle>(id).unwrap().height;
            assert!(height > 0.0);

            for _ in 0..600 {
                run_system(&ParticleSystem, &mut world, &InputState::default());
                assert!(world.registry.get::<Particle>(id).unwrap().height >= 0.0);
            }
        }
    }
}
