//! Player input. The sampled [`InputState`](crate::system::InputState) drives
//! the player's velocity and queues its action requests.

use tracing::trace;

use super::{try_begin_attack, whole_pixels};
use crate::entity::{Dead, PlayerControl, Stats, Velocity};
use crate::events::InteractionAttempted;
use crate::store::ComponentKind;
use crate::system::{System, TickContext, World};

/// Turns the input sample into the player's velocity and action requests.
///
/// Walking speed is `speed × movementSpeedModifier × dt` per axis. A dead
/// player stands still and produces no requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSystem;

impl System for InputSystem {
    fn name(&self) -> &'static str {
        "input"
    }

    fn run(&self, world: &mut World, ctx: &TickContext<'_>) {
        let Some(player) = world
            .registry
            .first_matching(&[ComponentKind::PlayerControl, ComponentKind::Velocity])
        else {
            return;
        };

        if world.registry.has::<Dead>(player) {
            if let Some(velocity) = world.registry.get_mut::<Velocity>(player) {
                *velocity = Velocity::ZERO;
            }
            return;
        }

        let input = ctx.input;
        let base_speed = world
            .registry
            .get::<PlayerControl>(player)
            .map_or(0.0, |control| control.speed);
        let modifier = world
            .registry
            .get::<Stats>(player)
            .map_or(1.0, |stats| stats.derived().movement_speed_modifier);
        let step = base_speed * modifier * ctx.dt;

        let axis = |negative: bool, positive: bool| -> f32 {
            f32::from(i8::from(positive) - i8::from(negative))
        };
        let velocity = Velocity::new(
            whole_pixels(axis(input.left, input.right) * step),
            whole_pixels(axis(input.up, input.down) * step),
        );
        if let Some(current) = world.registry.get_mut::<Velocity>(player) {
            *current = velocity;
        }

        if input.attack && try_begin_attack(world, ctx.frames, player) {
            trace!(entity = %player, "player attack requested");
        }
        if input.interact {
            world
                .events
                .interactions
                .push(InteractionAttempted { actor: player });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{ImageId, WeaponKind};
    use crate::entity::{Animation, Attack, AttackState, Direction, Position};
    use crate::events::GameEvent;
    use crate::system::InputState;
    use crate::tests::helpers::{empty_frames, open_level, sword_frames, test_world, walk_cycle};
    use tilegrid::Rect;

    fn player(world: &mut World, speed: f32) -> crate::entity::EntityId {
        let id = world.registry.create();
        world.registry.add(id, Position::new(0, 0));
        world.registry.add(id, Velocity::ZERO);
        world.registry.add(id, PlayerControl { speed });
        world
            .registry
            .add(id, Attack::new(5.0, 20.0, 0.5, WeaponKind::Sword).unwrap());
        id
    }

    #[test]
    fn diagonal_input_moves_both_axes() {
        let mut world = test_world();
        let id = player(&mut world, 120.0);
        let level = open_level();
        let frames = empty_frames();
        let input = InputState {
            up: true,
            right: true,
            ..InputState::default()
        };
        let ctx = TickContext {
            dt: 1.0 / 60.0,
            input: &input,
            level: &level,
            frames: &frames,
        };
        InputSystem.run(&mut world, &ctx);
        assert_eq!(world.registry.get::<Velocity>(id), Some(&Velocity::new(2, -2)));
    }

    #[test]
    fn slow_player_still_moves_one_pixel() {
        let mut world = test_world();
        let id = player(&mut world, 6.0);
        let level = open_level();
        let frames = empty_frames();
        let input = InputState {
            left: true,
            ..InputState::default()
        };
        let ctx = TickContext {
            dt: 1.0 / 60.0,
            input: &input,
            level: &level,
            frames: &frames,
        };
        InputSystem.run(&mut world, &ctx);
        assert_eq!(world.registry.get::<Velocity>(id), Some(&Velocity::new(-1, 0)));
    }

    #[test]
    fn attack_press_queues_request_and_starts_cooldown() {
        let mut world = test_world();
        let id = player(&mut world, 60.0);
        let level = open_level();
        let frames = empty_frames();
        let input = InputState {
            attack: true,
            ..InputState::default()
        };
        let ctx = TickContext {
            dt: 1.0 / 60.0,
            input: &input,
            level: &level,
            frames: &frames,
        };
        InputSystem.run(&mut world, &ctx);
        assert_eq!(world.events.attacks.len(), 1);
        assert!(!world.registry.get::<Attack>(id).unwrap().is_ready());

        // Cooldown blocks the next press.
        InputSystem.run(&mut world, &ctx);
        assert_eq!(world.events.attacks.len(), 1);
    }

    #[test]
    fn missing_attack_frames_abort_the_attack() {
        let mut world = test_world();
        let id = player(&mut world, 60.0);
        world
            .registry
            .add(id, Animation::new(walk_cycle(), 8.0).unwrap());
        let level = open_level();
        let frames = empty_frames();
        let input = InputState {
            attack: true,
            ..InputState::default()
        };
        let ctx = TickContext {
            dt: 1.0 / 60.0,
            input: &input,
            level: &level,
            frames: &frames,
        };
        InputSystem.run(&mut world, &ctx);

        assert!(world.events.attacks.is_empty());
        assert!(world.registry.get::<Attack>(id).unwrap().is_ready());
        assert_eq!(world.events.log(), &[GameEvent::AttackAborted { entity: id }]);

        let frames = sword_frames();
        let ctx = TickContext {
            frames: &frames,
            ..ctx
        };
        InputSystem.run(&mut world, &ctx);
        assert_eq!(world.events.attacks.len(), 1);
        assert!(world.registry.get::<Animation>(id).unwrap().is_attacking());
    }

    #[test]
    fn swing_faces_the_heading_pressed_this_tick() {
        let mut world = test_world();
        let id = player(&mut world, 60.0);
        world
            .registry
            .add(id, Animation::new(walk_cycle(), 8.0).unwrap());
        assert_eq!(
            world.registry.get::<Animation>(id).unwrap().direction(),
            Direction::Down
        );
        let level = open_level();
        let frames = sword_frames();
        let input = InputState {
            up: true,
            attack: true,
            ..InputState::default()
        };
        let ctx = TickContext {
            dt: 1.0 / 60.0,
            input: &input,
            level: &level,
            frames: &frames,
        };
        InputSystem.run(&mut world, &ctx);

        assert_eq!(world.registry.get::<Velocity>(id), Some(&Velocity::new(0, -1)));
        let animation = world.registry.get_mut::<Animation>(id).unwrap();
        assert_eq!(animation.attack().map(AttackState::direction), Some(Direction::Up));
        let up = u32::try_from(Direction::Up.index()).unwrap();
        assert_eq!(animation.current_image(), Some(ImageId::new(100 + 10 * up)));

        // The middle frame of the latched swing carries the sword hitbox.
        assert!(animation.active_hitboxes().is_empty());
        assert!(animation.advance_attack(0.1));
        assert_eq!(animation.active_hitboxes(), &[Rect::new(-4, -4, 24, 24)]);
    }

    #[test]
    fn dead_player_stands_still() {
        let mut world = test_world();
        let id = player(&mut world, 60.0);
        world.registry.add(id, Velocity::new(3, 3));
        world.registry.add(id, Dead::default());
        let level = open_level();
        let frames = empty_frames();
        let input = InputState {
            down: true,
            attack: true,
            interact: true,
            ..InputState::default()
        };
        let ctx = TickContext {
            dt: 1.0 / 60.0,
            input: &input,
            level: &level,
            frames: &frames,
        };
        InputSystem.run(&mut world, &ctx);
        assert_eq!(world.registry.get::<Velocity>(id), Some(&Velocity::ZERO));
        assert!(world.events.attacks.is_empty());
        assert!(world.events.interactions.is_empty());
    }
}
