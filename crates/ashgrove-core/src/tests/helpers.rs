//! Fixtures for building worlds, levels and frame sets in tests.

use tilegrid::{Rect, TileGrid};

use crate::assets::{AttackFrameSet, FrameLibrary, ImageId, WeaponKind};
use crate::config::GameConfig;
use crate::system::{InputState, System, TickContext, World};

// =============================================================================
// World & level
// =============================================================================

/// An empty world with default tunables.
pub fn test_world() -> World {
    World::new(GameConfig::default()).expect("default config is valid")
}

/// A 40×30 grid of 16 px tiles (640×480 px) with no walls.
pub fn open_level() -> TileGrid {
    TileGrid::new(40, 30, 16).expect("valid grid")
}

// =============================================================================
// Frames
// =============================================================================

/// Four-frame walk cycles; direction `d` uses images `10·d .. 10·d + 4`.
pub fn walk_cycle() -> [Vec<ImageId>; 4] {
    std::array::from_fn(|d| (0..4).map(|f| ImageId::new(10 * d as u32 + f)).collect())
}

/// A frame provider with nothing loaded.
pub fn empty_frames() -> FrameLibrary {
    FrameLibrary::new()
}

/// A provider whose sword swing has three 0.1 s frames in every direction.
///
/// Only the middle frame carries a hitbox.
pub fn sword_frames() -> FrameLibrary {
    let frames = std::array::from_fn(|d| {
        (0..3)
            .map(|f| ImageId::new(100 + 10 * d as u32 + f))
            .collect()
    });
    let hitboxes = std::array::from_fn(|_| {
        vec![Vec::new(), vec![Rect::new(-4, -4, 24, 24)], Vec::new()]
    });
    let mut library = FrameLibrary::new();
    library.insert_attack(
        WeaponKind::Sword,
        AttackFrameSet {
            frames,
            hitboxes,
            frame_duration: 0.1,
            total_frames: 3,
        },
    );
    library
}

// =============================================================================
// Running systems
// =============================================================================

/// Runs one system once over an open level with no frames loaded.
pub fn run_system(system: &dyn System, world: &mut World, input: &InputState) {
    let level = open_level();
    let frames = empty_frames();
    let ctx = TickContext {
        dt: world.config.tick_dt(),
        input,
        level: &level,
        frames: &frames,
    };
    system.run(world, &ctx);
}
