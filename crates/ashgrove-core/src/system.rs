//! The system contract and the state systems operate on.
//!
//! A system is a stateless pass run once per tick. It reads and writes only
//! the [`World`] it is given, and sees the host's collaborators through a
//! [`TickContext`]. Systems never call each other; anything one system needs
//! to tell another goes through the [`EventBus`](crate::events::EventBus).
//!
//! # Invariants
//!
//! - Systems run strictly sequentially in the order of
//!   [`default_systems`](crate::systems::default_systems)
//! - Systems snapshot id lists before destroying or removing through them
//! - Systems never panic on missing components or unknown ids

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tilegrid::TileMap;

use crate::assets::FrameProvider;
use crate::camera::Camera;
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::events::EventBus;
use crate::registry::Registry;

/// Discrete intents sampled from the input source once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    /// Walk up
    pub up: bool,
    /// Walk down
    pub down: bool,
    /// Walk left
    pub left: bool,
    /// Walk right
    pub right: bool,
    /// Swing the equipped weapon
    pub attack: bool,
    /// Interact with something nearby
    pub interact: bool,
}

/// Read-only collaborators handed to every system for one tick.
#[derive(Clone, Copy)]
pub struct TickContext<'a> {
    /// Seconds per tick
    pub dt: f32,
    /// This tick's input sample
    pub input: &'a InputState,
    /// The level being played
    pub level: &'a dyn TileMap,
    /// Animation frames
    pub frames: &'a dyn FrameProvider,
}

/// Everything systems mutate.
#[derive(Debug, Clone)]
pub struct World {
    /// Entities and components
    pub registry: Registry,
    /// Per-tick queues and the outbound log
    pub events: EventBus,
    /// The only randomness source
    pub rng: ChaCha8Rng,
    /// Tunables
    pub config: GameConfig,
    /// Viewport
    pub camera: Camera,
    /// Ticks completed so far
    pub tick: u64,
}

impl World {
    /// Creates an empty world seeded from `config.seed`.
    ///
    /// # Errors
    ///
    /// Returns the first invalid tunable found by [`GameConfig::validate`].
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            registry: Registry::new(),
            events: EventBus::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            camera: Camera::new(config.viewport_width, config.viewport_height),
            config,
            tick: 0,
        })
    }
}

/// A stateless per-tick pass over the world.
pub trait System {
    /// Name used in trace spans.
    fn name(&self) -> &'static str;

    /// Runs the pass once.
    fn run(&self, world: &mut World, ctx: &TickContext<'_>);
}
