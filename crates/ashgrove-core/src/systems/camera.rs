use crate::store::ComponentKind;
use crate::system::{System, TickContext, World};

use super::center_of;

/// Keeps the viewport centred on the player, clamped to the level.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraSystem;

impl System for CameraSystem {
    fn name(&self) -> &'static str {
        "camera"
    }

    fn run(&self, world: &mut World, ctx: &TickContext<'_>) {
        let Some(player) = world
            .registry
            .first_matching(&[ComponentKind::PlayerControl, ComponentKind::Position])
        else {
            return;
        };
        if let Some(focus) = center_of(&world.registry, player) {
            world
                .camera
                .follow(focus, ctx.level.pixel_width(), ctx.level.pixel_height());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Collider, PlayerControl, Position};
    use crate::system::InputState;
    use crate::tests::helpers::{run_system, test_world};

    #[test]
    fn follows_player_center() {
        let mut world = test_world();
        world.camera = crate::camera::Camera::new(64, 48);
        let player = world.registry.create();
        world.registry.add(player, PlayerControl { speed: 60.0 });
        world.registry.add(player, Position::new(150, 90));
        world.registry.add(player, Collider::new(10, 10, 0, 0).unwrap());

        run_system(&CameraSystem, &mut world, &InputState::default());

        // Hitbox centre is (155, 95); the 640×480 test level does not clamp.
        assert_eq!((world.camera.x, world.camera.y), (123, 71));
    }

    #[test]
    fn no_player_leaves_camera_alone() {
        let mut world = test_world();
        world.camera.x = 7;
        run_system(&CameraSystem, &mut world, &InputState::default());
        assert_eq!(world.camera.x, 7);
    }
}
