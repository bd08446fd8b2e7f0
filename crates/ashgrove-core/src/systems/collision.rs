//! Per-axis tile collision with slide-to-contact resolution.
//!
//! Each axis is resolved on its own from the pre-collision hitbox. The scan
//! covers every tile row (or column) the hitbox spans and every tile column
//! (or row) the leading edge crosses, so fast movers cannot tunnel. A blocked
//! axis is shortened to stop flush against the first solid tile.
//!
//! When both axes move, the combined step can still clip the outer corner of
//! a tile that neither single-axis scan saw. In that case the vertical
//! component is dropped, then the horizontal one.

use tilegrid::{Rect, TileMap};
use tracing::warn;

use crate::entity::{Collider, Position, Velocity};
use crate::store::ComponentKind;
use crate::system::{System, TickContext, World};

/// Clamps velocities so hitboxes never end a tick inside a solid tile.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionSystem;

impl System for CollisionSystem {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn run(&self, world: &mut World, ctx: &TickContext<'_>) {
        let tile_size = ctx.level.tile_size();
        if tile_size <= 0 {
            warn!(tile_size, "collision skipped: level reports non-positive tile size");
            return;
        }
        let movers = world.registry.query(&[
            ComponentKind::Position,
            ComponentKind::Velocity,
            ComponentKind::Collider,
        ]);
        for id in movers {
            let (Some(position), Some(velocity), Some(collider)) = (
                world.registry.get::<Position>(id).copied(),
                world.registry.get::<Velocity>(id).copied(),
                world.registry.get::<Collider>(id).copied(),
            ) else {
                continue;
            };
            if velocity.is_zero() {
                continue;
            }
            let resolved = resolve_velocity(ctx.level, collider.hitbox(position), velocity);
            if resolved != velocity {
                if let Some(v) = world.registry.get_mut::<Velocity>(id) {
                    *v = resolved;
                }
            }
        }
    }
}

/// Returns the largest part of `velocity` the hitbox can travel this tick.
///
/// The level's tile size must be positive.
#[must_use]
pub fn resolve_velocity(level: &dyn TileMap, hitbox: Rect, velocity: Velocity) -> Velocity {
    let vx = clamp_horizontal(level, hitbox, velocity.x);
    let vy = clamp_vertical(level, hitbox, velocity.y);
    if vx == 0 || vy == 0 {
        return Velocity::new(vx, vy);
    }
    let blocked = |v: Velocity| level.rect_overlaps_solid(&hitbox.translated(v.as_ivec2()));
    let both = Velocity::new(vx, vy);
    if !blocked(both) {
        return both;
    }
    let horizontal = Velocity::new(vx, 0);
    if !blocked(horizontal) {
        return horizontal;
    }
    Velocity::new(0, vy)
}

fn clamp_horizontal(level: &dyn TileMap, hitbox: Rect, vx: i32) -> i32 {
    if vx == 0 {
        return 0;
    }
    let ts = level.tile_size();
    let rows = level.pixel_to_tile(hitbox.y)..=level.pixel_to_tile(hitbox.bottom());
    let column_blocked = |tx: i32| rows.clone().any(|ty| level.is_solid(tx, ty));

    if vx > 0 {
        let lead = hitbox.right();
        let (from, to) = (level.pixel_to_tile(lead), level.pixel_to_tile(lead + vx));
        for tx in from + 1..=to {
            if column_blocked(tx) {
                return (tx * ts - 1 - lead).clamp(0, vx);
            }
        }
    } else {
        let lead = hitbox.x;
        let (from, to) = (level.pixel_to_tile(lead), level.pixel_to_tile(lead + vx));
        for tx in (to..from).rev() {
            if column_blocked(tx) {
                return ((tx + 1) * ts - lead).clamp(vx, 0);
            }
        }
    }
    vx
}

fn clamp_vertical(level: &dyn TileMap, hitbox: Rect, vy: i32) -> i32 {
    if vy == 0 {
        return 0;
    }
    let ts = level.tile_size();
    let columns = level.pixel_to_tile(hitbox.x)..=level.pixel_to_tile(hitbox.right());
    let row_blocked = |ty: i32| columns.clone().any(|tx| level.is_solid(tx, ty));

    if vy > 0 {
        let lead = hitbox.bottom();
        let (from, to) = (level.pixel_to_tile(lead), level.pixel_to_tile(lead + vy));
        for ty in from + 1..=to {
            if row_blocked(ty) {
                return (ty * ts - 1 - lead).clamp(0, vy);
            }
        }
    } else {
        let lead = hitbox.y;
        let (from, to) = (level.pixel_to_tile(lead), level.pixel_to_tile(lead + vy));
        for ty in (to..from).rev() {
            if row_blocked(ty) {
                return ((ty + 1) * ts - lead).clamp(vy, 0);
            }
        }
    }
    vy
}
