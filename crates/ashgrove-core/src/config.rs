//! Game-balance tunables and loop cadence.
//!
//! Everything here is a tunable, not a structural contract: the level curve,
//! per-level attribute gain, corpse decay and effect timings can all be changed
//! without touching system code. Hosts usually load a [`GameConfig`] from JSON;
//! missing fields fall back to [`Default`].
//!
//! ```
//! use ashgrove_core::config::GameConfig;
//!
//! let config: GameConfig = serde_json::from_str(r#"{ "tick_rate": 30.0 }"#).unwrap();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.level_curve.xp_to_next(1), 100);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Experience threshold curve: `floor(base × growth^(level − 1))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelCurve {
    /// Threshold to leave level 1.
    pub base: f64,
    /// Multiplier applied per level.
    pub growth: f64,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            base: 100.0,
            growth: 1.5,
        }
    }
}

impl LevelCurve {
    /// Returns the XP needed to advance from `level` to `level + 1`.
    ///
    /// Levels below 1 are treated as 1. Saturates at `u64::MAX` for absurd
    /// levels.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap
    )]
    pub fn xp_to_next(&self, level: u32) -> u64 {
        let exponent = level.max(1) - 1;
        let raw = self.base * self.growth.powi(exponent as i32);
        raw.floor().max(1.0) as u64
    }

    /// Checks that the curve is strictly increasing from level 1 onwards.
    ///
    /// `base × (growth − 1) ≥ 1` guarantees consecutive raw values differ by at
    /// least one whole point, so their floors differ too.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLevelCurve`] otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = self.base.is_finite() && self.growth.is_finite();
        if !finite || self.base < 1.0 || self.base * (self.growth - 1.0) < 1.0 {
            return Err(ConfigError::InvalidLevelCurve {
                base: self.base,
                growth: self.growth,
            });
        }
        Ok(())
    }
}

/// Hit-burst particle tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Particles spawned per hit.
    pub count: u32,
    /// Maximum horizontal drift speed in pixels per second.
    pub speed: f32,
    /// Initial upward speed in pixels per second.
    pub lift: f32,
    /// Downward acceleration in pixels per second squared.
    pub gravity: f32,
    /// Fraction of vertical speed kept on each bounce.
    pub restitution: f32,
    /// Seconds a particle lives.
    pub lifetime: f32,
    /// Edge length of the drawn square in pixels.
    pub size: i32,
    /// Packed RGBA colour.
    pub color: u32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 6,
            speed: 40.0,
            lift: 60.0,
            gravity: 240.0,
            restitution: 0.5,
            lifetime: 0.6,
            size: 2,
            color: 0xB0_20_20_FF,
        }
    }
}

/// Every tunable the systems read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Logical ticks per second.
    pub tick_rate: f32,
    /// Most ticks one `advance` call may run before dropping the backlog.
    pub max_catch_up_ticks: u32,
    /// Seed for the simulation RNG.
    pub seed: u64,
    /// XP threshold curve.
    pub level_curve: LevelCurve,
    /// Points added to each base attribute per level gained.
    pub attribute_gain_per_level: u32,
    /// Floor for derived attack speed.
    pub min_attack_speed: f32,
    /// Floor for damage after mitigation.
    pub min_damage: f32,
    /// Seconds a corpse stays before despawning.
    pub corpse_lifetime: f32,
    /// Decay stages used when a corpse carries no stage sprites.
    pub decay_stages: u32,
    /// Seconds the took-damage flicker lasts.
    pub flash_duration: f32,
    /// Length of one visible/invisible flicker segment.
    pub flash_segment: f32,
    /// Arrival threshold multiplier for wandering AI.
    pub wander_arrival_multiplier: f32,
    /// Hit-burst particles.
    pub particles: ParticleConfig,
    /// Camera viewport width in pixels.
    pub viewport_width: i32,
    /// Camera viewport height in pixels.
    pub viewport_height: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_catch_up_ticks: 8,
            seed: 0x5EED,
            level_curve: LevelCurve::default(),
            attribute_gain_per_level: 1,
            min_attack_speed: 0.25,
            min_damage: 1.0,
            corpse_lifetime: 10.0,
            decay_stages: 4,
            flash_duration: 0.3,
            flash_segment: 0.05,
            wander_arrival_multiplier: 1.5,
            particles: ParticleConfig::default(),
            viewport_width: 320,
            viewport_height: 240,
        }
    }
}

impl GameConfig {
    /// Seconds per logical tick.
    #[must_use]
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate
    }

    /// Rejects tunables that would break system invariants.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(ConfigError::InvalidTickRate(self.tick_rate));
        }
        if self.max_catch_up_ticks == 0 {
            return Err(tunable("max_catch_up_ticks", "must be at least 1"));
        }
        self.level_curve.validate()?;
        if !(self.min_attack_speed > 0.0) {
            return Err(tunable("min_attack_speed", "must be positive"));
        }
        if !(self.min_damage > 0.0) {
            return Err(tunable("min_damage", "must be positive"));
        }
        if !(self.corpse_lifetime > 0.0) {
            return Err(tunable("corpse_lifetime", "must be positive"));
        }
        if self.decay_stages == 0 {
            return Err(tunable("decay_stages", "must be at least 1"));
        }
        if !(self.flash_duration >= 0.0) {
            return Err(tunable("flash_duration", "must not be negative"));
        }
        if !(self.flash_segment > 0.0) {
            return Err(tunable("flash_segment", "must be positive"));
        }
        if !(self.wander_arrival_multiplier > 0.0) {
            return Err(tunable("wander_arrival_multiplier", "must be positive"));
        }
        if !(self.particles.lifetime > 0.0) {
            return Err(tunable("particles.lifetime", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.particles.restitution) {
            return Err(tunable("particles.restitution", "must be within [0, 1]"));
        }
        if self.viewport_width <= 0 || self.viewport_height <= 0 {
            return Err(tunable("viewport", "dimensions must be positive"));
        }
        Ok(())
    }
}

fn tunable(name: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidTunable { name, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn default_curve_matches_reference_points() {
        let curve = LevelCurve::default();
        assert_eq!(curve.xp_to_next(1), 100);
        assert_eq!(curve.xp_to_next(2), 150);
        assert_eq!(curve.xp_to_next(3), 225);
        assert_eq!(curve.xp_to_next(4), 337);
    }

    #[test]
    fn flat_curve_is_rejected() {
        let curve = LevelCurve {
            base: 100.0,
            growth: 1.0,
        };
        assert!(matches!(
            curve.validate(),
            Err(ConfigError::InvalidLevelCurve { .. })
        ));
    }

    #[test]
    fn shallow_curve_with_small_base_is_rejected() {
        // floor(1 * 1.1^n) stalls at 1 for the first levels.
        let curve = LevelCurve {
            base: 1.0,
            growth: 1.1,
        };
        assert!(curve.validate().is_err());
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let config = GameConfig {
            tick_rate: 0.0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidTickRate(0.0)));
    }

    #[test]
    fn zero_decay_stages_is_rejected() {
        let config = GameConfig {
            decay_stages: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTunable {
                name: "decay_stages",
                ..
            })
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "seed": 7, "particles": { "count": 2 } }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.particles.count, 2);
        assert_eq!(config.tick_rate, 60.0);
        assert_eq!(config.particles.gravity, ParticleConfig::default().gravity);
    }

    proptest! {
        #[test]
        fn valid_curves_strictly_increase(
            base in 1.0f64..500.0,
            extra in 0.0f64..1.5,
            level in 1u32..40,
        ) {
            let growth = 1.0 + 1.01 / base + extra;
            let curve = LevelCurve { base, growth };
            prop_assume!(curve.validate().is_ok());
            prop_assert!(curve.xp_to_next(level + 1) > curve.xp_to_next(level));
        }
    }
}
