//! The tick loop.
//!
//! A [`Simulation`] owns the [`World`] and the ordered system list. Each call
//! to [`Simulation::step`] runs one logical tick:
//!
//! 1. **SYSTEMS**: every system runs once, strictly in order, each inside a
//!    `trace_span` named after it
//! 2. **CLEAR**: per-tick event queues are emptied so no signal outlives its
//!    consumer's pass (the outbound [`GameEvent`] log is kept)
//! 3. **ADVANCE**: the tick counter moves on
//!
//! [`Simulation::advance`] wraps `step` in a fixed-timestep accumulator for
//! hosts driven by wall-clock frame deltas.
//!
//! # Determinism
//!
//! Given the same config (including its seed), the same spawns and the same
//! input sequence, two simulations produce identical worlds and event logs:
//! - Registry tables are `BTreeMap`s, so every query runs in id order
//! - All randomness comes from the world's seeded `ChaCha8Rng`
//! - Systems never run concurrently
//!
//! # Example
//!
//! ```
//! use ashgrove_core::assets::FrameLibrary;
//! use ashgrove_core::config::GameConfig;
//! use ashgrove_core::simulation::Simulation;
//! use ashgrove_core::system::InputState;
//! use tilegrid::TileGrid;
//!
//! let level = TileGrid::new(20, 15, 16).unwrap();
//! let frames = FrameLibrary::new();
//! let mut sim = Simulation::new(GameConfig::default()).unwrap();
//!
//! for _ in 0..10 {
//!     sim.step(&InputState::default(), &level, &frames);
//! }
//!
//! assert_eq!(sim.tick(), 10);
//! ```

use std::fmt;

use tilegrid::TileMap;
use tracing::trace_span;

use crate::assets::FrameProvider;
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::events::GameEvent;
use crate::render::{render, Renderer};
use crate::system::{InputState, System, TickContext, World};
use crate::systems::default_systems;
use crate::timestep::FixedTimestep;

/// Owns the world and drives systems tick by tick.
pub struct Simulation {
    world: World,
    systems: Vec<Box<dyn System>>,
    timestep: FixedTimestep,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.systems.iter().map(|s| s.name()).collect();
        f.debug_struct("Simulation")
            .field("world", &self.world)
            .field("systems", &names)
            .field("timestep", &self.timestep)
            .finish()
    }
}

impl Simulation {
    /// Creates a simulation with an empty world and the default system order.
    ///
    /// # Errors
    ///
    /// Returns the first invalid tunable in `config`.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_systems(config, default_systems())
    }

    /// Creates a simulation running `systems` in the given order.
    ///
    /// # Errors
    ///
    /// Returns the first invalid tunable in `config`.
    pub fn with_systems(
        config: GameConfig,
        systems: Vec<Box<dyn System>>,
    ) -> Result<Self, ConfigError> {
        let timestep = FixedTimestep::new(config.tick_dt(), config.max_catch_up_ticks);
        Ok(Self {
            world: World::new(config)?,
            systems,
            timestep,
        })
    }

    /// Runs exactly one tick.
    pub fn step(&mut self, input: &InputState, level: &dyn TileMap, frames: &dyn FrameProvider) {
        let ctx = TickContext {
            dt: self.world.config.tick_dt(),
            input,
            level,
            frames,
        };
        let tick = self.world.tick;
        for system in &self.systems {
            let _span = trace_span!("system", name = system.name(), tick).entered();
            system.run(&mut self.world, &ctx);
        }
        self.world.events.clear_transient();
        self.world.tick += 1;
    }

    /// Feeds a wall-clock frame delta and runs every tick that became due.
    ///
    /// The same input sample is used for all of them. Returns the number of
    /// ticks run; hosts only need to redraw when it is at least one.
    pub fn advance(
        &mut self,
        frame_delta: f64,
        input: &InputState,
        level: &dyn TileMap,
        frames: &dyn FrameProvider,
    ) -> u32 {
        let due = self.timestep.accumulate(frame_delta);
        for _ in 0..due {
            self.step(input, level, frames);
        }
        due
    }

    /// Draws the current state.
    pub fn render(&self, renderer: &mut dyn Renderer) {
        render(&self.world, renderer);
    }

    /// Drains the outbound event log.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.world.events.take_log()
    }

    /// Returns a reference to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns a mutable reference to the world.
    ///
    /// Use this to spawn entities between ticks.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Ticks completed so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.world.tick
    }

    /// Names of the systems in run order.
    #[must_use]
    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }
}
