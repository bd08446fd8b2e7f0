//! # Ashgrove Core
//!
//! Entity-component runtime and gameplay systems for the Ashgrove top-down
//! tile engine.
//!
//! The crate is a deterministic, single-threaded simulation: the host owns
//! the window, assets and level, and hands them to a [`Simulation`] by
//! reference once per tick.
//!
//! ## Architecture
//!
//! - **Entities**: opaque [`EntityId`]s with one table per component kind
//!   ([`Registry`])
//! - **Systems**: stateless passes run in a fixed order ([`systems`])
//! - **Events**: typed per-tick queues, each drained by one system
//!   ([`EventBus`]), plus an outbound [`GameEvent`] log for the host
//! - **Collaborators**: [`tilegrid::TileMap`], [`FrameProvider`] and
//!   [`Renderer`] traits implemented by the host
//!
//! ## Usage
//!
//! ```rust
//! use ashgrove_core::{FrameLibrary, GameConfig, InputState, Simulation};
//! use tilegrid::TileGrid;
//!
//! let level = TileGrid::new(32, 32, 16)?;
//! let frames = FrameLibrary::new();
//! let mut sim = Simulation::new(GameConfig::default())?;
//!
//! // A 20 ms frame covers one 60 Hz tick.
//! let ticks = sim.advance(0.02, &InputState::default(), &level, &frames);
//! assert_eq!(ticks, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod assets;
pub mod camera;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod prefabs;
pub mod registry;
pub mod render;
pub mod simulation;
pub mod store;
pub mod system;
pub mod systems;
pub mod timestep;

#[cfg(test)]
mod tests;

pub use assets::{AttackFrameSet, FrameLibrary, FrameProvider, ImageId, WeaponKind};
pub use config::GameConfig;
pub use entity::EntityId;
pub use error::ConfigError;
pub use events::{EventBus, GameEvent};
pub use registry::Registry;
pub use render::Renderer;
pub use simulation::Simulation;
pub use system::{InputState, System, TickContext, World};
