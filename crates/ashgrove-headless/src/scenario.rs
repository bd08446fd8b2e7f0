//! The demo scenario: a walled meadow, a player, a few monsters and a sign.

use ashgrove_core::assets::{AttackFrameSet, FrameLibrary, ImageId, WeaponKind};
use ashgrove_core::entity::{Attack, Attributes, Collider, Sprite, Wander};
use ashgrove_core::prefabs::{
    spawn_interactable, spawn_player, spawn_wanderer, Appearance, Combatant,
};
use ashgrove_core::{EntityId, InputState, Renderer, Simulation};
use anyhow::{Context, Result};
use glam::IVec2;
use serde::{Deserialize, Serialize};
use tilegrid::{Rect, TileGrid};
use tracing::{debug, trace};

const MEADOW: &str = "
    ##############################
    #............................#
    #....##..............##......#
    #............................#
    #..........#####.............#
    #............................#
    #......................##....#
    #....##......................#
    #............................#
    #..............#.............#
    #............................#
    ##############################
";

/// Open floor in the built-in meadow for a 12×10 hitbox offset by (2, 14).
const MONSTER_SPAWNS: [(i32, i32); 8] = [
    (80, 144),
    (144, 144),
    (208, 144),
    (272, 144),
    (336, 144),
    (400, 40),
    (176, 24),
    (320, 24),
];

/// Run length and map for the headless session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Simulated wall-clock seconds
    pub duration: f64,
    /// Wall-clock seconds per host frame
    pub frame_delta: f64,
    /// ASCII map rows; `#` is solid
    pub map: Option<Vec<String>>,
    /// Tile edge length in pixels
    pub tile_size: i32,
    /// Monsters to spawn
    pub monsters: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            duration: 20.0,
            frame_delta: 1.0 / 30.0,
            map: None,
            tile_size: 16,
            monsters: 4,
        }
    }
}

impl Session {
    /// Builds the level from the configured rows, or the built-in meadow.
    pub fn level(&self) -> Result<TileGrid> {
        let source = self
            .map
            .as_ref()
            .map_or_else(|| MEADOW.to_owned(), |rows| rows.join("\n"));
        TileGrid::from_ascii(&source, self.tile_size).context("building level")
    }
}

/// Frame ids handed out by the stand-in asset loader.
pub fn frames() -> FrameLibrary {
    let mut library = FrameLibrary::new();
    for (weapon, base) in [(WeaponKind::Sword, 1000), (WeaponKind::Claw, 2000)] {
        library.insert_attack(
            weapon,
            AttackFrameSet {
                frames: std::array::from_fn(|d| {
                    (0..4).map(|f| ImageId::new(base + 10 * d as u32 + f)).collect()
                }),
                hitboxes: std::array::from_fn(|_| {
                    (0..4)
                        .map(|f| {
                            if f == 2 {
                                vec![Rect::new(-6, -6, 28, 28)]
                            } else {
                                Vec::new()
                            }
                        })
                        .collect()
                }),
                frame_duration: 0.08,
                total_frames: 4,
            },
        );
    }
    library
}

fn appearance(base: u32) -> Appearance {
    Appearance {
        walk: std::array::from_fn(|d| {
            (0..4)
                .map(|f| ImageId::new(base + 10 * d as u32 + f))
                .collect()
        }),
        decay: (0..4).map(|s| ImageId::new(base + 90 + s)).collect(),
        width: 16,
        height: 24,
        fps: 8.0,
    }
}

/// Spawns the cast and returns the player id.
pub fn populate(sim: &mut Simulation, session: &Session) -> Result<EntityId> {
    let world = sim.world_mut();
    let hero = Combatant {
        health: 60.0,
        mana: Some(20.0),
        attributes: Attributes::new(5, 4, 3, 4),
        attack: Attack::new(8.0, 28.0, 0.45, WeaponKind::Sword)?,
        collider: Collider::new(12, 10, 2, 14)?,
    };
    let player = spawn_player(world, IVec2::new(48, 48), 80.0, &hero, &appearance(0))?;

    let monster = Combatant {
        health: 18.0,
        mana: None,
        attributes: Attributes::uniform(2),
        attack: Attack::new(3.0, 22.0, 1.2, WeaponKind::Claw)?,
        collider: Collider::new(12, 10, 2, 14)?,
    };
    for i in 0..session.monsters as usize {
        let (x, y) = MONSTER_SPAWNS[i % MONSTER_SPAWNS.len()];
        let origin = IVec2::new(x, y);
        let wander = Wander::new(origin, 40.0, 0.5, 2.0, 40.0)?;
        let id = spawn_wanderer(world, wander, 60, &monster, &appearance(500))?;
        debug!(entity = %id, x = origin.x, y = origin.y, "monster placed");
    }

    spawn_interactable(
        world,
        IVec2::new(56, 56),
        24.0,
        "weathered signpost",
        Some(Sprite::new(ImageId::new(900), 16, 16)),
    )?;
    Ok(player)
}

/// Scripted input: patrol the meadow, swing often, read the sign once.
pub fn input_at(tick: u64) -> InputState {
    let leg = (tick / 90) % 4;
    InputState {
        right: leg == 0,
        down: leg == 1,
        left: leg == 2,
        up: leg == 3,
        attack: tick % 20 == 0,
        interact: tick == 3,
    }
}

/// Renderer that only counts and traces what it is asked to draw.
#[derive(Debug, Default)]
pub struct TraceRenderer {
    /// Sprites drawn since creation
    pub sprites: u64,
    /// Particles drawn since creation
    pub particles: u64,
}

impl Renderer for TraceRenderer {
    fn draw_sprite(&mut self, image: ImageId, x: i32, y: i32) {
        self.sprites += 1;
        trace!(image = image.raw(), x, y, "sprite");
    }

    fn draw_particle(&mut self, x: i32, y: i32, size: i32, color: u32) {
        self.particles += 1;
        trace!(x, y, size, color, "particle");
    }
}
