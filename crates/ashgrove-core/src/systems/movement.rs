use crate::entity::{Position, Velocity};
use crate::store::ComponentKind;
use crate::system::{System, TickContext, World};

/// Integrates `position += velocity`. Collision has already clamped velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementSystem;

impl System for MovementSystem {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn run(&self, world: &mut World, _ctx: &TickContext<'_>) {
        for id in world
            .registry
            .query(&[ComponentKind::Position, ComponentKind::Velocity])
        {
            let Some(velocity) = world.registry.get::<Velocity>(id).copied() else {
                continue;
            };
            if let Some(position) = world.registry.get_mut::<Position>(id) {
                position.x += velocity.x;
                position.y += velocity.y;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::InputState;
    use crate::tests::helpers::run_system;

    #[test]
    fn applies_velocity_unconditionally() {
        let mut world = crate::tests::helpers::test_world();
        let mover = world.registry.create();
        world.registry.add(mover, Position::new(10, 10));
        world.registry.add(mover, Velocity::new(-3, 4));
        let still = world.registry.create();
        world.registry.add(still, Position::new(1, 1));

        run_system(&MovementSystem, &mut world, &InputState::default());

        assert_eq!(world.registry.get::<Position>(mover), Some(&Position::new(7, 14)));
        assert_eq!(world.registry.get::<Position>(still), Some(&Position::new(1, 1)));
    }
}
