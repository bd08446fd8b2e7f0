//! Tile maps: the level collaborator consumed by the engine core.
//!
//! The core only ever talks to a level through [`TileMap`]. [`TileGrid`] is the
//! in-memory implementation used by the headless host and by tests; a windowed
//! host would implement the trait over whatever its map loader produces.
//!
//! # Out-of-bounds tiles
//!
//! Every tile outside `0..width × 0..height` reports solid, so movers can never
//! leave the map through an open edge.

use thiserror::Error;
use tracing::debug;

use crate::rect::Rect;

/// Errors raised while building a tile grid.
///
/// These indicate a setup bug, so they are only produced at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Tile size must be a positive number of pixels.
    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(i32),
    /// Grid dimensions must both be positive.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions {
        /// Requested width in tiles
        width: i32,
        /// Requested height in tiles
        height: i32,
    },
    /// ASCII source contained no rows.
    #[error("ascii map is empty")]
    EmptyMap,
    /// ASCII rows must all have the same length.
    #[error("ascii row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based row index
        row: usize,
        /// Width of the first row
        expected: usize,
        /// Width of the offending row
        found: usize,
    },
}

/// Read-only view of a tile level.
///
/// Implementations must be cheap to query; collision calls `is_solid` for
/// every tile a moving hitbox sweeps across, every tick.
pub trait TileMap {
    /// Returns true if the tile at `(tile_x, tile_y)` blocks movement.
    ///
    /// Coordinates outside the map must report `true`.
    fn is_solid(&self, tile_x: i32, tile_y: i32) -> bool;

    /// Returns the edge length of a square tile in pixels.
    fn tile_size(&self) -> i32;

    /// Returns the map width in tiles.
    fn width(&self) -> i32;

    /// Returns the map height in tiles.
    fn height(&self) -> i32;

    /// Returns the map width in pixels.
    fn pixel_width(&self) -> i32 {
        self.width() * self.tile_size()
    }

    /// Returns the map height in pixels.
    fn pixel_height(&self) -> i32 {
        self.height() * self.tile_size()
    }

    /// Converts a pixel coordinate to the tile coordinate containing it.
    ///
    /// Uses euclidean division so negative pixels land in negative tiles.
    fn pixel_to_tile(&self, pixel: i32) -> i32 {
        pixel.div_euclid(self.tile_size().max(1))
    }

    /// Returns true if any tile covered by `rect` is solid.
    fn rect_overlaps_solid(&self, rect: &Rect) -> bool {
        if rect.is_empty() {
            return false;
        }
        let (x0, x1) = (self.pixel_to_tile(rect.x), self.pixel_to_tile(rect.right()));
        let (y0, y1) = (self.pixel_to_tile(rect.y), self.pixel_to_tile(rect.bottom()));
        (y0..=y1).any(|ty| (x0..=x1).any(|tx| self.is_solid(tx, ty)))
    }
}

/// Dense boolean tile grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tile_size: i32,
    solid: Vec<bool>,
}

impl TileGrid {
    /// Creates an all-open grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if the tile size or either dimension is not positive.
    pub fn new(width: i32, height: i32, tile_size: i32) -> Result<Self, GridError> {
        if tile_size <= 0 {
            return Err(GridError::InvalidTileSize(tile_size));
        }
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        #[allow(clippy::cast_sign_loss)]
        let cells = (width * height) as usize;
        Ok(Self {
            width,
            height,
            tile_size,
            solid: vec![false; cells],
        })
    }

    /// Builds a grid from ASCII art: `#` is solid, any other character is open.
    ///
    /// Leading and trailing whitespace on each line is ignored, as are blank
    /// lines, so the map can be written as an indented string literal.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] for an invalid tile size, an empty map, or rows of
    /// unequal length.
    pub fn from_ascii(source: &str, tile_size: i32) -> Result<Self, GridError> {
        let rows: Vec<&str> = source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let Some(first) = rows.first() else {
            return Err(GridError::EmptyMap);
        };
        let expected = first.chars().count();
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(GridError::RaggedRow {
                    row,
                    expected,
                    found,
                });
            }
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let mut grid = Self::new(expected as i32, rows.len() as i32, tile_size)?;
        for (ty, line) in rows.iter().enumerate() {
            for (tx, ch) in line.chars().enumerate() {
                if ch == '#' {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                    let (tx, ty) = (tx as i32, ty as i32);
                    grid.set_solid(tx, ty, true);
                }
            }
        }
        debug!(
            width = grid.width,
            height = grid.height,
            tile_size,
            "built tile grid from ascii"
        );
        Ok(grid)
    }

    /// Marks a tile solid or open. Returns false if the tile is out of bounds.
    pub fn set_solid(&mut self, tile_x: i32, tile_y: i32, solid: bool) -> bool {
        match self.index(tile_x, tile_y) {
            Some(index) => {
                self.solid[index] = solid;
                true
            }
            None => false,
        }
    }

    fn index(&self, tile_x: i32, tile_y: i32) -> Option<usize> {
        if tile_x < 0 || tile_y < 0 || tile_x >= self.width || tile_y >= self.height {
            return None;
        }
        #[allow(clippy::cast_sign_loss)]
        let index = (tile_y * self.width + tile_x) as usize;
        Some(index)
    }
}

impl TileMap for TileGrid {
    fn is_solid(&self, tile_x: i32, tile_y: i32) -> bool {
        self.index(tile_x, tile_y).map_or(true, |index| self.solid[index])
    }

    fn tile_size(&self) -> i32 {
        self.tile_size
    }

    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod construction_tests {
        use super::*;

        #[test]
        fn rejects_non_positive_tile_size() {
            assert_eq!(TileGrid::new(4, 4, 0), Err(GridError::InvalidTileSize(0)));
            assert_eq!(TileGrid::new(4, 4, -8), Err(GridError::InvalidTileSize(-8)));
        }

        #[test]
        fn rejects_empty_dimensions() {
            assert_eq!(
                TileGrid::new(0, 3, 16),
                Err(GridError::InvalidDimensions {
                    width: 0,
                    height: 3
                })
            );
        }

        #[test]
        fn ascii_parses_walls() {
            let grid = TileGrid::from_ascii("###\n#.#\n###", 8).unwrap();
            assert_eq!(grid.width(), 3);
            assert_eq!(grid.height(), 3);
            assert_eq!(grid.pixel_width(), 24);
            assert!(grid.is_solid(0, 0));
            assert!(!grid.is_solid(1, 1));
        }

        #[test]
        fn ascii_rejects_ragged_rows() {
            let err = TileGrid::from_ascii("###\n##\n###", 8).unwrap_err();
            assert_eq!(
                err,
                GridError::RaggedRow {
                    row: 1,
                    expected: 3,
                    found: 2
                }
            );
        }

        #[test]
        fn ascii_rejects_empty_source() {
            assert_eq!(TileGrid::from_ascii("  \n\n", 8), Err(GridError::EmptyMap));
        }

        #[test]
        fn error_messages_are_descriptive() {
            assert_eq!(
                GridError::InvalidTileSize(0).to_string(),
                "tile size must be positive, got 0"
            );
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn out_of_bounds_is_solid() {
            let grid = TileGrid::new(2, 2, 16).unwrap();
            assert!(!grid.is_solid(0, 0));
            assert!(grid.is_solid(-1, 0));
            assert!(grid.is_solid(0, 2));
            assert!(grid.is_solid(2, 0));
        }

        #[test]
        fn set_solid_outside_is_rejected() {
            let mut grid = TileGrid::new(2, 2, 16).unwrap();
            assert!(grid.set_solid(1, 1, true));
            assert!(grid.is_solid(1, 1));
            assert!(!grid.set_solid(5, 5, true));
        }

        #[test]
        fn pixel_to_tile_handles_negatives() {
            let grid = TileGrid::new(2, 2, 16).unwrap();
            assert_eq!(grid.pixel_to_tile(0), 0);
            assert_eq!(grid.pixel_to_tile(15), 0);
            assert_eq!(grid.pixel_to_tile(16), 1);
            assert_eq!(grid.pixel_to_tile(-1), -1);
        }

        #[test]
        fn rect_overlap_uses_inclusive_edges() {
            let mut grid = TileGrid::new(4, 4, 16).unwrap();
            grid.set_solid(2, 1, true);
            // Right edge at pixel 31 stays in tile column 1.
            assert!(!grid.rect_overlaps_solid(&Rect::new(16, 16, 16, 16)));
            // One more pixel reaches column 2.
            assert!(grid.rect_overlaps_solid(&Rect::new(17, 16, 16, 16)));
        }
    }

    proptest! {
        #[test]
        fn pixel_lies_inside_its_tile(pixel in -10_000i32..10_000, tile_size in 1i32..64) {
            let grid = TileGrid::new(1, 1, tile_size).unwrap();
            let tile = grid.pixel_to_tile(pixel);
            prop_assert!(tile * tile_size <= pixel);
            prop_assert!(pixel < (tile + 1) * tile_size);
        }
    }
}
