//! Entity templates for the host's composition root.
//!
//! Every spawner validates its whole template before allocating an id, so a
//! rejected template leaves the registry untouched.

use glam::IVec2;
use tracing::debug;

use crate::assets::ImageId;
use crate::entity::{
    Animation, Attack, Attributes, Collider, DecaySprites, EntityId, Experience, Faction,
    FactionFlags, Health, Interactable, Mana, Participants, PlayerControl, Position, Sprite,
    Stats, Velocity, Wander, XpReward,
};
use crate::error::ConfigError;
use crate::system::World;
use crate::systems::recalculate_stats;

/// How an animated entity looks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Appearance {
    /// Walk cycle per direction, indexed by [`Direction::index`](crate::entity::Direction::index)
    pub walk: [Vec<ImageId>; 4],
    /// Corpse images, one per decay stage
    pub decay: Vec<ImageId>,
    /// Sprite width in pixels
    pub width: i32,
    /// Sprite height in pixels
    pub height: i32,
    /// Walk cycle frames per second
    pub fps: f32,
}

/// Fighting capabilities shared by players and monsters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combatant {
    /// Health before stat bonuses
    pub health: f32,
    /// Mana before stat bonuses; `None` for entities without a mana pool
    pub mana: Option<f32>,
    /// Starting attributes
    pub attributes: Attributes,
    /// Weapon
    pub attack: Attack,
    /// Hitbox relative to the position
    pub collider: Collider,
}

struct Body {
    health: Health,
    mana: Option<Mana>,
    stats: Stats,
    animation: Animation,
    sprite: Sprite,
}

fn build_body(combatant: &Combatant, appearance: &Appearance) -> Result<Body, ConfigError> {
    let animation = Animation::new(appearance.walk.clone(), appearance.fps)?;
    let image = animation
        .current_image()
        .or_else(|| appearance.decay.first().copied())
        .unwrap_or(ImageId::new(0));
    Ok(Body {
        health: Health::new(combatant.health)?,
        mana: combatant.mana.map(Mana::new).transpose()?,
        stats: Stats::new(combatant.attributes)?,
        animation,
        sprite: Sprite::new(image, appearance.width, appearance.height),
    })
}

fn attach_body(
    world: &mut World,
    id: EntityId,
    at: IVec2,
    combatant: &Combatant,
    body: Body,
    appearance: &Appearance,
) {
    let registry = &mut world.registry;
    registry.add(id, Position::from(at));
    registry.add(id, Velocity::ZERO);
    registry.add(id, combatant.collider);
    registry.add(id, combatant.attack);
    registry.add(id, body.health);
    if let Some(mana) = body.mana {
        registry.add(id, mana);
    }
    registry.add(id, body.stats);
    registry.add(id, Experience::new(&world.config.level_curve));
    registry.add(id, Participants::default());
    registry.add(id, body.animation);
    registry.add(id, body.sprite);
    registry.add(
        id,
        DecaySprites {
            stages: appearance.decay.clone(),
        },
    );

    recalculate_stats(registry, id, world.config.min_attack_speed);
    if let Some(health) = registry.get_mut::<Health>(id) {
        health.heal_full();
    }
    if let Some(mana) = registry.get_mut::<Mana>(id) {
        mana.refill();
    }
}

/// Spawns the input-controlled player at `at`.
///
/// `speed` is the walking speed in pixels per second.
///
/// # Errors
///
/// Returns the first invalid part of the template.
pub fn spawn_player(
    world: &mut World,
    at: IVec2,
    speed: f32,
    combatant: &Combatant,
    appearance: &Appearance,
) -> Result<EntityId, ConfigError> {
    if !(speed.is_finite() && speed > 0.0) {
        return Err(ConfigError::InvalidTunable {
            name: "player.speed",
            reason: "must be positive",
        });
    }
    let body = build_body(combatant, appearance)?;
    let id = world.registry.create();
    attach_body(world, id, at, combatant, body, appearance);
    world.registry.add(id, Faction(FactionFlags::PLAYER));
    world.registry.add(id, PlayerControl { speed });
    debug!(entity = %id, x = at.x, y = at.y, "player spawned");
    Ok(id)
}

/// Spawns a hostile wanderer at its wander origin.
///
/// # Errors
///
/// Returns the first invalid part of the template.
pub fn spawn_wanderer(
    world: &mut World,
    wander: Wander,
    xp: u64,
    combatant: &Combatant,
    appearance: &Appearance,
) -> Result<EntityId, ConfigError> {
    let body = build_body(combatant, appearance)?;
    let id = world.registry.create();
    attach_body(world, id, wander.origin(), combatant, body, appearance);
    world.registry.add(id, Faction(FactionFlags::ENEMY));
    world.registry.add(id, wander);
    world.registry.add(id, XpReward { xp });
    debug!(entity = %id, xp, "wanderer spawned");
    Ok(id)
}

/// Spawns a static interactable object such as a sign or chest.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidReach`] for a negative or non-finite radius.
pub fn spawn_interactable(
    world: &mut World,
    at: IVec2,
    radius: f32,
    label: impl Into<String>,
    sprite: Option<Sprite>,
) -> Result<EntityId, ConfigError> {
    if !(radius.is_finite() && radius >= 0.0) {
        return Err(ConfigError::InvalidReach(radius));
    }
    let id = world.registry.create();
    world.registry.add(id, Position::from(at));
    world.registry.add(
        id,
        Interactable {
            radius,
            label: label.into(),
        },
    );
    if let Some(sprite) = sprite {
        world.registry.add(id, sprite);
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::WeaponKind;
    use crate::tests::helpers::{test_world, walk_cycle};

    fn soldier() -> Combatant {
        Combatant {
            health: 30.0,
            mana: Some(5.0),
            attributes: Attributes::new(4, 2, 1, 3),
            attack: Attack::new(6.0, 24.0, 0.8, WeaponKind::Sword).unwrap(),
            collider: Collider::new(12, 10, 2, 6).unwrap(),
        }
    }

    fn look() -> Appearance {
        Appearance {
            walk: walk_cycle(),
            decay: vec![ImageId::new(90), ImageId::new(91)],
            width: 16,
            height: 16,
            fps: 8.0,
        }
    }

    #[test]
    fn player_starts_with_full_derived_pools() {
        let mut world = test_world();
        let id = spawn_player(&mut world, IVec2::new(40, 50), 60.0, &soldier(), &look()).unwrap();

        let health = world.registry.get::<Health>(id).unwrap();
        // 30 + 5 × 3 + 2 × 1.
        assert_eq!(health.max(), 47.0);
        assert_eq!(health.current(), health.max());
        // 5 + 5 × 1 + 1.
        assert_eq!(world.registry.get::<Mana>(id).map(Mana::current), Some(11.0));
        assert_eq!(
            world.registry.get::<Stats>(id).map(|s| s.derived().attack_power),
            Some(9)
        );
        assert!(world.registry.has::<PlayerControl>(id));
        assert_eq!(world.registry.get::<Position>(id), Some(&Position::new(40, 50)));
    }

    #[test]
    fn wanderer_spawns_at_origin_as_enemy() {
        let mut world = test_world();
        let wander = Wander::new(IVec2::new(200, 200), 30.0, 0.5, 1.5, 40.0).unwrap();
        let id = spawn_wanderer(&mut world, wander, 20, &soldier(), &look()).unwrap();

        assert_eq!(world.registry.get::<Position>(id), Some(&Position::new(200, 200)));
        assert_eq!(world.registry.get::<XpReward>(id), Some(&XpReward { xp: 20 }));
        let faction = world.registry.get::<Faction>(id).unwrap();
        assert!(faction.0.contains(FactionFlags::ENEMY));
    }

    #[test]
    fn invalid_template_allocates_nothing() {
        let mut world = test_world();
        let broken = Combatant {
            health: 0.0,
            ..soldier()
        };
        assert!(spawn_player(&mut world, IVec2::ZERO, 60.0, &broken, &look()).is_err());
        let bad_fps = Appearance { fps: 0.0, ..look() };
        assert!(spawn_player(&mut world, IVec2::ZERO, 60.0, &soldier(), &bad_fps).is_err());
        assert!(spawn_interactable(&mut world, IVec2::ZERO, -1.0, "sign", None).is_err());
        assert!(world.registry.is_empty());
    }
}
