use crate::entity::{Animation, Dead, Sprite, Velocity};
use crate::store::ComponentKind;
use crate::system::{System, TickContext, World};

/// Drives walk cycles and running attacks, then publishes the frame to the sprite.
///
/// Corpses are left alone so the decay images stay put.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationSystem;

impl System for AnimationSystem {
    fn name(&self) -> &'static str {
        "animation"
    }

    fn run(&self, world: &mut World, ctx: &TickContext<'_>) {
        for id in world.registry.query(&[ComponentKind::Animation]) {
            if world.registry.has::<Dead>(id) {
                continue;
            }
            let velocity = world
                .registry
                .get::<Velocity>(id)
                .copied()
                .unwrap_or(Velocity::ZERO);
            let Some(animation) = world.registry.get_mut::<Animation>(id) else {
                continue;
            };
            if animation.is_attacking() {
                animation.advance_attack(ctx.dt);
            } else {
                animation.update_locomotion(velocity, ctx.dt);
            }
            let image = animation.current_image();

            if let (Some(image), Some(sprite)) = (image, world.registry.get_mut::<Sprite>(id)) {
                sprite.image = image;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageId;
    use crate::system::InputState;
    use crate::tests::helpers::{run_system, test_world, walk_cycle};

    #[test]
    fn sprite_follows_walk_cycle() {
        let mut world = test_world();
        let id = world.registry.create();
        world.registry.add(id, Velocity::new(0, -2));
        world.registry.add(id, Sprite::new(ImageId::new(0), 16, 16));
        world.registry.add(id, Animation::new(walk_cycle(), 8.0).unwrap());

        run_system(&AnimationSystem, &mut world, &InputState::default());

        let animation = world.registry.get::<Animation>(id).unwrap();
        assert_eq!(animation.direction(), crate::entity::Direction::Up);
        assert_eq!(
            world.registry.get::<Sprite>(id).map(|s| s.image),
            animation.current_image()
        );
    }

    #[test]
    fn attack_plays_out_then_returns_to_walking() {
        let mut world = test_world();
        let frames = crate::tests::helpers::sword_frames();
        let set = crate::assets::FrameProvider::attack_frames(
            &frames,
            crate::assets::WeaponKind::Sword,
        )
            .unwrap()
            .clone();
        let id = world.registry.create();
        world.registry.add(id, Velocity::new(3, 0));
        world.registry.add(id, Sprite::new(ImageId::new(0), 16, 16));
        let mut animation = Animation::new(walk_cycle(), 8.0).unwrap();
        assert!(animation.start_attack(
            &set.frames,
            &set.hitboxes,
            set.frame_duration,
            set.total_frames
        ));
        world.registry.add(id, animation);

        let mut ticks = 0;
        while world.registry.get::<Animation>(id).is_some_and(Animation::is_attacking) {
            run_system(&AnimationSystem, &mut world, &InputState::default());
            ticks += 1;
            assert!(ticks < 600, "attack never finished");
        }
        // Direction was latched at the start, so the walk resumes from there.
        let animation = world.registry.get::<Animation>(id).unwrap();
        assert_eq!(animation.direction(), crate::entity::Direction::Down);
        run_system(&AnimationSystem, &mut world, &InputState::default());
        let animation = world.registry.get::<Animation>(id).unwrap();
        assert_eq!(animation.direction(), crate::entity::Direction::Right);
    }

    #[test]
    fn corpses_keep_their_sprite() {
        let mut world = test_world();
        let id = world.registry.create();
        world.registry.add(id, Velocity::new(2, 0));
        world.registry.add(id, Sprite::new(ImageId::new(999), 16, 16));
        world.registry.add(id, Animation::new(walk_cycle(), 8.0).unwrap());
        world.registry.add(id, Dead::default());

        run_system(&AnimationSystem, &mut world, &InputState::default());

        assert_eq!(
            world.registry.get::<Sprite>(id).map(|s| s.image),
            Some(ImageId::new(999))
        );
    }
}
