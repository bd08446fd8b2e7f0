//! Headless Ashgrove host.
//!
//! Usage: `ashgrove-headless [config.json]`
//!
//! The optional JSON file has two sections, both with defaults:
//!
//! ```json
//! { "game": { "tick_rate": 60.0, "seed": 7 }, "session": { "duration": 30.0 } }
//! ```

mod scenario;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ashgrove_core::entity::{Experience, Health};
use ashgrove_core::{GameConfig, GameEvent, Simulation};
use serde::{Deserialize, Serialize};
use tilegrid::TileMap;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use scenario::{Session, TraceRenderer};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct HostConfig {
    game: GameConfig,
    session: Session,
}

fn load_config(path: Option<&Path>) -> Result<HostConfig> {
    let Some(path) = path else {
        return Ok(HostConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

#[derive(Debug, Default)]
struct Tally {
    hits: u64,
    deaths: u64,
    level_ups: u64,
    interactions: u64,
    aborted: u64,
    despawned: u64,
}

impl Tally {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Hit { .. } => self.hits += 1,
            GameEvent::Died { entity, killer } => {
                info!(entity = %entity, killer = %killer, "death");
                self.deaths += 1;
            }
            GameEvent::LevelUp { entity, level } => {
                info!(entity = %entity, level, "level up");
                self.level_ups += 1;
            }
            GameEvent::Interacted { label, .. } => {
                info!(label = %label, "interaction");
                self.interactions += 1;
            }
            GameEvent::AttackAborted { .. } => self.aborted += 1,
            GameEvent::Despawned { .. } => self.despawned += 1,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args().nth(1);
    let config = load_config(path.as_deref().map(Path::new))?;
    let session = config.session;
    let level = session.level()?;
    let frames = scenario::frames();

    let mut sim = Simulation::new(config.game).context("invalid game config")?;
    let player = scenario::populate(&mut sim, &session)?;
    info!(
        entities = sim.world().registry.len(),
        width = level.pixel_width(),
        height = level.pixel_height(),
        seed = sim.world().config.seed,
        "scenario ready"
    );

    let mut tally = Tally::default();
    let mut renderer = TraceRenderer::default();
    let mut frame = 0u64;
    let mut elapsed = 0.0;
    while elapsed < session.duration {
        let input = scenario::input_at(sim.tick());
        let ran = sim.advance(session.frame_delta, &input, &level, &frames);
        for event in sim.take_events() {
            tally.record(&event);
        }
        if ran > 0 {
            sim.render(&mut renderer);
        }
        elapsed += session.frame_delta;
        frame += 1;
    }
    debug!(frames = frame, "loop finished");

    let registry = &sim.world().registry;
    let health = registry.get::<Health>(player).map_or(0.0, Health::current);
    let level_reached = registry.get::<Experience>(player).map_or(1, Experience::level);
    println!("ticks:        {}", sim.tick());
    println!("frames:       {frame}");
    println!("hits:         {}", tally.hits);
    println!("deaths:       {}", tally.deaths);
    println!("level ups:    {}", tally.level_ups);
    println!("interactions: {}", tally.interactions);
    println!("aborted:      {}", tally.aborted);
    println!("despawned:    {}", tally.despawned);
    println!("player:       level {level_reached}, {health:.1} hp");
    println!(
        "drawn:        {} sprites, {} particles",
        renderer.sprites, renderer.particles
    );
    Ok(())
}
