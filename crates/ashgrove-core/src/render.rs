//! Draw ordering and the renderer collaborator.
//!
//! Sprites draw in two layers: corpses first, then the living. Inside a layer
//! entities draw from the top of the screen down by their visual bottom edge,
//! which gives top-down pseudo-depth. The sort is stable, so entities with the
//! same bottom keep registry order and never swap between frames. Particles
//! are drawn afterwards in their own flat-rectangle pass.

use glam::IVec2;

use crate::assets::ImageId;
use crate::entity::{Collider, Dead, EntityId, Particle, Position, Sprite};
use crate::registry::Registry;
use crate::store::ComponentKind;
use crate::system::World;

/// Draw target supplied by the host.
pub trait Renderer {
    /// Draws `image` with its top-left corner at viewport pixel (`x`, `y`).
    fn draw_sprite(&mut self, image: ImageId, x: i32, y: i32);

    /// Draws a filled `size × size` square in the additive particle pass.
    fn draw_particle(&mut self, x: i32, y: i32, size: i32, color: u32);
}

/// What the draw order compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawKey {
    /// Corpse layer
    pub dead: bool,
    /// Visual bottom edge in world pixels
    pub bottom: i32,
}

/// Stable-sorts `items` corpses first, then by ascending bottom edge.
pub fn sort_for_drawing<T>(items: &mut [(T, DrawKey)]) {
    items.sort_by_key(|(_, key)| (!key.dead, key.bottom));
}

/// Entities with a position and sprite, in draw order. Particles are excluded.
#[must_use]
pub fn render_order(registry: &Registry) -> Vec<EntityId> {
    let mut items: Vec<(EntityId, DrawKey)> = registry
        .query(&[ComponentKind::Position, ComponentKind::Sprite])
        .into_iter()
        .filter(|&id| !registry.has::<Particle>(id))
        .filter_map(|id| draw_key(registry, id).map(|key| (id, key)))
        .collect();
    sort_for_drawing(&mut items);
    items.into_iter().map(|(id, _)| id).collect()
}

fn draw_key(registry: &Registry, id: EntityId) -> Option<DrawKey> {
    let position = *registry.get::<Position>(id)?;
    let sprite = registry.get::<Sprite>(id)?;
    let bottom = if sprite.height > 0 {
        position.y + sprite.height
    } else if let Some(collider) = registry.get::<Collider>(id) {
        let hitbox = collider.hitbox(position);
        hitbox.y + hitbox.height
    } else {
        position.y
    };
    Some(DrawKey {
        dead: registry.has::<Dead>(id),
        bottom,
    })
}

/// Draws the world through `renderer`, camera-relative.
///
/// Sprites hidden by a damage flicker are skipped.
#[allow(clippy::cast_possible_truncation)]
pub fn render(world: &World, renderer: &mut dyn Renderer) {
    let camera = &world.camera;
    for id in render_order(&world.registry) {
        let (Some(position), Some(sprite)) = (
            world.registry.get::<Position>(id),
            world.registry.get::<Sprite>(id),
        ) else {
            continue;
        };
        if !sprite.visible {
            continue;
        }
        let screen = camera.to_screen(position.as_ivec2());
        renderer.draw_sprite(sprite.image, screen.x, screen.y);
    }

    for id in world.registry.query(&[ComponentKind::Particle]) {
        let Some(particle) = world.registry.get::<Particle>(id) else {
            continue;
        };
        let ground = particle.position.round().as_ivec2();
        let lifted = ground - IVec2::new(0, particle.height.round() as i32);
        let screen = camera.to_screen(lifted);
        renderer.draw_particle(screen.x, screen.y, particle.size, particle.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    #[derive(Default)]
    struct Recorder {
        sprites: Vec<(ImageId, i32, i32)>,
        particles: Vec<(i32, i32, i32, u32)>,
    }

    impl Renderer for Recorder {
        fn draw_sprite(&mut self, image: ImageId, x: i32, y: i32) {
            self.sprites.push((image, x, y));
        }

        fn draw_particle(&mut self, x: i32, y: i32, size: i32, color: u32) {
            self.particles.push((x, y, size, color));
        }
    }

    fn drawable(registry: &mut Registry, y: i32, height: i32, image: u32) -> EntityId {
        let id = registry.create();
        registry.add(id, Position::new(0, y));
        registry.add(id, Sprite::new(ImageId::new(image), 16, height));
        id
    }

    mod order_tests {
        use super::*;

        #[test]
        fn corpses_draw_under_the_living() {
            let mut registry = Registry::new();
            let alive_high = drawable(&mut registry, 0, 16, 0);
            let corpse_low = drawable(&mut registry, 200, 16, 1);
            registry.add(corpse_low, Dead::default());
            let alive_low = drawable(&mut registry, 100, 16, 2);

            assert_eq!(render_order(&registry), vec![corpse_low, alive_high, alive_low]);
        }

        #[test]
        fn collider_bottom_is_the_fallback() {
            let mut registry = Registry::new();
            let tall_sprite = drawable(&mut registry, 10, 40, 0);
            let unknown_height = drawable(&mut registry, 10, 0, 1);
            registry.add(unknown_height, Collider::new(8, 20, 0, 5).unwrap());

            // 10 + 40 = 50 versus 10 + 5 + 20 = 35.
            assert_eq!(render_order(&registry), vec![unknown_height, tall_sprite]);
        }

        #[test]
        fn particles_are_not_sprites() {
            let mut registry = Registry::new();
            let sprite = drawable(&mut registry, 0, 8, 0);
            let odd = drawable(&mut registry, 0, 8, 1);
            registry.add(odd, Particle {
                position: Vec2::ZERO,
                drift: Vec2::ZERO,
                height: 0.0,
                vertical_speed: 0.0,
                size: 1,
                color: 0,
            });
            assert_eq!(render_order(&registry), vec![sprite]);
        }
    }

    #[test]
    fn render_is_camera_relative_and_skips_hidden() {
        let mut world = crate::tests::helpers::test_world();
        world.camera.x = 10;
        world.camera.y = 5;
        let shown = world.registry.create();
        world.registry.add(shown, Position::new(30, 30));
        world.registry.add(shown, Sprite::new(ImageId::new(4), 16, 16));
        let hidden = world.registry.create();
        world.registry.add(hidden, Position::new(0, 0));
        let mut sprite = Sprite::new(ImageId::new(5), 16, 16);
        sprite.visible = false;
        world.registry.add(hidden, sprite);
        let spark = world.registry.create();
        world.registry.add(spark, Particle {
            position: Vec2::new(20.0, 20.0),
            drift: Vec2::ZERO,
            height: 3.0,
            vertical_speed: 0.0,
            size: 2,
            color: 0xFF,
        });

        let mut recorder = Recorder::default();
        render(&world, &mut recorder);

        assert_eq!(recorder.sprites, vec![(ImageId::new(4), 20, 25)]);
        assert_eq!(recorder.particles, vec![(10, 12, 2, 0xFF)]);
    }

    proptest! {
        #[test]
        fn draw_order_is_a_stable_total_order(
            keys in proptest::collection::vec((any::<bool>(), -500i32..500), 0..40),
        ) {
            let mut items: Vec<(usize, DrawKey)> = keys
                .iter()
                .enumerate()
                .map(|(i, &(dead, bottom))| (i, DrawKey { dead, bottom }))
                .collect();
            sort_for_drawing(&mut items);

            for pair in items.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                prop_assert!(a.1.dead || !b.1.dead, "living entity drawn before a corpse");
                if a.1.dead == b.1.dead {
                    prop_assert!(a.1.bottom <= b.1.bottom);
                    if a.1.bottom == b.1.bottom {
                        prop_assert!(a.0 < b.0, "equal keys lost insertion order");
                    }
                }
            }

            let mut again = items.clone();
            sort_for_drawing(&mut again);
            prop_assert_eq!(again, items);
        }
    }
}
