//! Construction-time configuration errors.
//!
//! Runtime edge cases (unknown entity, missing component, empty collections)
//! are never errors: systems branch on them and log. Only malformed static
//! configuration supplied at startup is rejected, through [`ConfigError`].

use thiserror::Error;

/// Rejected configuration, component parameters or tunables.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Collider width and height must both be positive.
    #[error("collider dimensions must be positive, got {width}x{height}")]
    InvalidCollider {
        /// Requested width
        width: i32,
        /// Requested height
        height: i32,
    },
    /// Wander parameters are inconsistent.
    #[error("invalid wander parameters: {0}")]
    InvalidWander(&'static str),
    /// Health or mana base must be positive.
    #[error("{resource} base must be positive, got {value}")]
    InvalidPool {
        /// "health" or "mana"
        resource: &'static str,
        /// Offending value
        value: f32,
    },
    /// Base attributes start at 1.
    #[error("base attribute {name} must be at least 1, got {value}")]
    InvalidAttribute {
        /// Attribute name
        name: &'static str,
        /// Offending value
        value: u32,
    },
    /// Lifetimes must start positive.
    #[error("lifetime must be positive, got {0}")]
    InvalidLifetime(f32),
    /// Attack parameters must be non-negative and finite.
    #[error("invalid attack parameters: {0}")]
    InvalidAttack(&'static str),
    /// Interaction reach must be finite and non-negative.
    #[error("interaction radius must be non-negative, got {0}")]
    InvalidReach(f32),
    /// Animation cadence must be positive.
    #[error("animation frame rate must be positive, got {0}")]
    InvalidFrameRate(f32),
    /// Tick rate must be positive.
    #[error("tick rate must be positive, got {0}")]
    InvalidTickRate(f32),
    /// The level curve would not be strictly increasing.
    #[error(
        "level curve must satisfy base >= 1 and base * (growth - 1) >= 1, \
         got base {base}, growth {growth}"
    )]
    InvalidLevelCurve {
        /// Threshold at level 1
        base: f64,
        /// Per-level multiplier
        growth: f64,
    },
    /// A tunable is out of range.
    #[error("invalid tunable {name}: {reason}")]
    InvalidTunable {
        /// Name of the field in `GameConfig`
        name: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}
