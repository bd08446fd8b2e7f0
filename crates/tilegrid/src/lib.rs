//! # Tilegrid
//!
//! Tile substrate for the Ashgrove engine: the level collaborator that
//! collision and camera code consult, plus the axis-aligned rectangles used for
//! hitboxes.
//!
//! - **[`TileMap`]**: the narrow read-only interface the engine core depends on
//!   (`is_solid`, `tile_size`, `width`, `height`)
//! - **[`TileGrid`]**: a validated in-memory implementation
//! - **[`Rect`]**: integer pixel rectangles with inclusive-edge helpers
//!
//! ## Quick Start
//!
//! ```
//! use tilegrid::{Rect, TileGrid, TileMap};
//!
//! let grid = TileGrid::from_ascii(
//!     "#####\n\
//!      #...#\n\
//!      ######",
//!     16,
//! )
//! .unwrap();
//!
//! assert!(grid.is_solid(0, 0));
//! assert!(!grid.is_solid(1, 1));
//! assert!(grid.rect_overlaps_solid(&Rect::new(10, 10, 8, 8)));
//! assert!(!grid.rect_overlaps_solid(&Rect::new(16, 16, 16, 16)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod grid;
pub mod rect;

pub use grid::{GridError, TileGrid, TileMap};
pub use rect::Rect;
