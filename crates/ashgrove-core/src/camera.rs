//! Viewport that follows a focus point across the level.

use glam::{IVec2, Vec2};

/// Top-left corner and size of the visible area, in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Camera {
    /// World x of the left edge
    pub x: i32,
    /// World y of the top edge
    pub y: i32,
    width: i32,
    height: i32,
}

impl Camera {
    /// Creates a camera at the world origin.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Viewport width.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Viewport height.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Centres on `focus`, clamped so the view stays inside the level.
    ///
    /// On an axis where the level is smaller than the viewport, the level is
    /// centred instead.
    pub fn follow(&mut self, focus: Vec2, level_width: i32, level_height: i32) {
        self.x = follow_axis(focus.x, self.width, level_width);
        self.y = follow_axis(focus.y, self.height, level_height);
    }

    /// Converts a world position to viewport coordinates.
    #[must_use]
    pub const fn to_screen(&self, world: IVec2) -> IVec2 {
        IVec2::new(world.x - self.x, world.y - self.y)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn follow_axis(focus: f32, view: i32, level: i32) -> i32 {
    if level <= view {
        return -(view - level) / 2;
    }
    let ideal = (focus - view as f32 / 2.0).round() as i32;
    ideal.clamp(0, level - view)
}
