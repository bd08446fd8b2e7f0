//! Plain data component records.
//!
//! One instance exists per (entity, component kind) pair. Records never point
//! back at their entity; the registry owns the association.
//!
//! Records with invariants keep their fields private and validate in `new`,
//! returning [`ConfigError`] for setup bugs. The rest are open structs.

use std::collections::BTreeMap;

use glam::{IVec2, Vec2};
use tilegrid::Rect;

use super::{EntityId, FactionFlags};
use crate::assets::{ImageId, WeaponKind};
use crate::config::LevelCurve;
use crate::error::ConfigError;

// =============================================================================
// Spatial
// =============================================================================

/// World position in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Horizontal pixel
    pub x: i32,
    /// Vertical pixel (grows downwards)
    pub y: i32,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position as an integer vector.
    #[must_use]
    pub const fn as_ivec2(self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }
}

impl From<IVec2> for Position {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Movement intent in whole pixels per tick.
///
/// Recomputed every tick by input or AI, clamped by collision, then applied by
/// movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Velocity {
    /// Horizontal pixels per tick
    pub x: i32,
    /// Vertical pixels per tick
    pub y: i32,
}

impl Velocity {
    /// At rest.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Creates a velocity.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true if neither axis moves.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Returns the velocity as an integer vector.
    #[must_use]
    pub const fn as_ivec2(self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }
}

/// Hitbox anchored at `Position + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collider {
    width: i32,
    height: i32,
    offset_x: i32,
    offset_y: i32,
}

impl Collider {
    /// Creates a collider.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCollider`] unless both dimensions are positive.
    pub fn new(width: i32, height: i32, offset_x: i32, offset_y: i32) -> Result<Self, ConfigError> {
        if width <= 0 || height <= 0 {
            return Err(ConfigError::InvalidCollider { width, height });
        }
        Ok(Self {
            width,
            height,
            offset_x,
            offset_y,
        })
    }

    /// Hitbox width in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Hitbox height in pixels.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Offset of the hitbox from the entity position.
    #[must_use]
    pub const fn offset(&self) -> IVec2 {
        IVec2::new(self.offset_x, self.offset_y)
    }

    /// Returns the hitbox rectangle for an entity at `position`.
    #[must_use]
    pub const fn hitbox(&self, position: Position) -> Rect {
        Rect::new(
            position.x + self.offset_x,
            position.y + self.offset_y,
            self.width,
            self.height,
        )
    }
}

// =============================================================================
// Vital pools
// =============================================================================

/// Hit points. `current` stays within `[0, max]`.
///
/// Tracked in `f32` so fractional damage accumulates even though hosts display
/// whole numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
    base: f32,
}

impl Health {
    /// Creates full health with `base` as the bonus-free maximum.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPool`] unless `base` is positive and finite.
    pub fn new(base: f32) -> Result<Self, ConfigError> {
        if !(base.is_finite() && base > 0.0) {
            return Err(ConfigError::InvalidPool {
                resource: "health",
                value: base,
            });
        }
        Ok(Self {
            current: base,
            max: base,
            base,
        })
    }

    /// Current hit points.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Maximum hit points including stat bonuses.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Maximum before stat bonuses.
    #[must_use]
    pub const fn base(&self) -> f32 {
        self.base
    }

    /// Returns true once hit points have reached zero.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Subtracts damage, clamping at zero. Returns the remaining hit points.
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        self.current = (self.current - amount.max(0.0)).clamp(0.0, self.max);
        self.current
    }

    /// Restores hit points up to the maximum.
    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }

    /// Restores hit points to the maximum.
    pub fn heal_full(&mut self) {
        self.current = self.max;
    }

    /// Sets a new maximum and clamps current hit points under it.
    pub fn set_max(&mut self, max: f32) {
        self.max = max.max(0.0);
        self.current = self.current.min(self.max);
    }
}

/// Spell points. Same shape as [`Health`], fed by `maxManaBonus`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mana {
    current: f32,
    max: f32,
    base: f32,
}

impl Mana {
    /// Creates a full pool with `base` as the bonus-free maximum.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPool`] unless `base` is positive and finite.
    pub fn new(base: f32) -> Result<Self, ConfigError> {
        if !(base.is_finite() && base > 0.0) {
            return Err(ConfigError::InvalidPool {
                resource: "mana",
                value: base,
            });
        }
        Ok(Self {
            current: base,
            max: base,
            base,
        })
    }

    /// Current spell points.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Maximum spell points including stat bonuses.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Maximum before stat bonuses.
    #[must_use]
    pub const fn base(&self) -> f32 {
        self.base
    }

    /// Spends `amount` if available. Returns false and spends nothing otherwise.
    pub fn spend(&mut self, amount: f32) -> bool {
        if amount > self.current {
            return false;
        }
        self.current -= amount.max(0.0);
        true
    }

    /// Restores the pool to its maximum.
    pub fn refill(&mut self) {
        self.current = self.max;
    }

    /// Sets a new maximum and clamps the current value under it.
    pub fn set_max(&mut self, max: f32) {
        self.max = max.max(0.0);
        self.current = self.current.min(self.max);
    }
}

// =============================================================================
// Progression
// =============================================================================

/// The four base attributes. Each is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attributes {
    /// Drives attack power
    pub strength: u32,
    /// Drives attack speed, defense and movement
    pub dexterity: u32,
    /// Drives mana
    pub intelligence: u32,
    /// Drives health and defense
    pub vitality: u32,
}

impl Attributes {
    /// Creates a set of attributes.
    #[must_use]
    pub const fn new(strength: u32, dexterity: u32, intelligence: u32, vitality: u32) -> Self {
        Self {
            strength,
            dexterity,
            intelligence,
            vitality,
        }
    }

    /// All four attributes set to `value`.
    #[must_use]
    pub const fn uniform(value: u32) -> Self {
        Self::new(value, value, value, value)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("strength", self.strength),
            ("dexterity", self.dexterity),
            ("intelligence", self.intelligence),
            ("vitality", self.vitality),
        ];
        for (name, value) in named {
            if value < 1 {
                return Err(ConfigError::InvalidAttribute { name, value });
            }
        }
        Ok(())
    }
}

/// Combat figures derived from attributes and level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedStats {
    /// Added to weapon damage
    pub attack_power: i32,
    /// Subtracted from incoming damage
    pub defense_power: i32,
    /// Added to base health
    pub max_health_bonus: i32,
    /// Added to base mana
    pub max_mana_bonus: i32,
    /// Cooldown divisor
    pub attack_speed: f32,
    /// Multiplier on walking speed
    pub movement_speed_modifier: f32,
}

impl Default for DerivedStats {
    fn default() -> Self {
        Self {
            attack_power: 0,
            defense_power: 0,
            max_health_bonus: 0,
            max_mana_bonus: 0,
            attack_speed: 1.0,
            movement_speed_modifier: 1.0,
        }
    }
}

/// Base attributes plus the derived figures computed from them.
///
/// Only the stat calculation system writes the derived half.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    base: Attributes,
    derived: DerivedStats,
}

impl Stats {
    /// Creates stats with neutral derived figures until the first recalculation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAttribute`] if any attribute is below 1.
    pub fn new(base: Attributes) -> Result<Self, ConfigError> {
        base.validate()?;
        Ok(Self {
            base,
            derived: DerivedStats::default(),
        })
    }

    /// Base attributes.
    #[must_use]
    pub const fn base(&self) -> &Attributes {
        &self.base
    }

    /// Derived figures as of the last recalculation.
    #[must_use]
    pub const fn derived(&self) -> &DerivedStats {
        &self.derived
    }

    pub(crate) fn set_derived(&mut self, derived: DerivedStats) {
        self.derived = derived;
    }

    pub(crate) fn grow(&mut self, gain: u32) {
        self.base.strength = self.base.strength.saturating_add(gain);
        self.base.dexterity = self.base.dexterity.saturating_add(gain);
        self.base.intelligence = self.base.intelligence.saturating_add(gain);
        self.base.vitality = self.base.vitality.saturating_add(gain);
    }
}

/// Level and experience progress.
///
/// `current_xp < xp_to_next_level` holds between grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Experience {
    level: u32,
    current_xp: u64,
    xp_to_next_level: u64,
}

impl Experience {
    /// Starts at level 1 with no experience.
    #[must_use]
    pub fn new(curve: &LevelCurve) -> Self {
        Self {
            level: 1,
            current_xp: 0,
            xp_to_next_level: curve.xp_to_next(1),
        }
    }

    /// Current level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Experience accumulated towards the next level.
    #[must_use]
    pub const fn current_xp(&self) -> u64 {
        self.current_xp
    }

    /// Experience required to leave the current level.
    #[must_use]
    pub const fn xp_to_next_level(&self) -> u64 {
        self.xp_to_next_level
    }

    /// Adds experience, levelling up as many times as it covers.
    ///
    /// Returns the number of levels gained.
    pub fn grant(&mut self, amount: u64, curve: &LevelCurve) -> u32 {
        self.current_xp = self.current_xp.saturating_add(amount);
        let mut gained = 0;
        while self.current_xp >= self.xp_to_next_level {
            self.current_xp -= self.xp_to_next_level;
            self.level = self.level.saturating_add(1);
            self.xp_to_next_level = curve.xp_to_next(self.level);
            gained += 1;
        }
        gained
    }
}

/// Experience handed out when this entity is defeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct XpReward {
    /// Total experience shared among contributors
    pub xp: u64,
}

/// Cumulative damage dealt to this entity, per attacker.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Participants {
    damage_by: BTreeMap<EntityId, f32>,
}

impl Participants {
    /// Adds `amount` to `attacker`'s running total.
    pub fn record(&mut self, attacker: EntityId, amount: f32) {
        *self.damage_by.entry(attacker).or_insert(0.0) += amount;
    }

    /// Damage dealt by one attacker.
    #[must_use]
    pub fn damage_by(&self, attacker: EntityId) -> Option<f32> {
        self.damage_by.get(&attacker).copied()
    }

    /// Sum of all recorded damage.
    #[must_use]
    pub fn total(&self) -> f32 {
        self.damage_by.values().sum()
    }

    /// Returns true if nobody has dealt damage.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.damage_by.is_empty()
    }

    /// Contributors in id order with their damage.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(EntityId, f32)> {
        self.damage_by.iter().map(|(id, dmg)| (*id, *dmg)).collect()
    }
}

// =============================================================================
// Combat
// =============================================================================

/// Melee attack parameters and cooldown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attack {
    /// Damage before stat bonuses
    pub damage: f32,
    /// Reach, measured between hitbox centers
    pub range: f32,
    /// Cooldown in seconds at attack speed 1
    pub cooldown_max: f32,
    /// Animation and hitbox set used when attacking
    pub weapon: WeaponKind,
    cooldown_remaining: f32,
}

impl Attack {
    /// Creates a ready attack.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAttack`] for negative or non-finite values.
    pub fn new(
        damage: f32,
        range: f32,
        cooldown_max: f32,
        weapon: WeaponKind,
    ) -> Result<Self, ConfigError> {
        let values = [damage, range, cooldown_max];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::InvalidAttack(
                "damage, range and cooldown must be finite and non-negative",
            ));
        }
        Ok(Self {
            damage,
            range,
            cooldown_max,
            weapon,
            cooldown_remaining: 0.0,
        })
    }

    /// Seconds until the next attack is allowed.
    #[must_use]
    pub const fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    /// Returns true when the cooldown has run out.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }

    /// Counts the cooldown down, flooring at zero.
    pub fn tick(&mut self, dt: f32) {
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
    }

    /// Restarts the cooldown, shortened by `attack_speed`.
    pub fn trigger(&mut self, attack_speed: f32) {
        self.cooldown_remaining = self.cooldown_max / attack_speed.max(f32::EPSILON);
    }
}

/// Faction tags used to pick valid combat targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Faction(pub FactionFlags);

/// Corpse marker. Presence means the entity no longer takes part in combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dead {
    /// Visual decomposition step; never decreases
    pub decay_stage: u32,
}

/// Took-damage flicker timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageFlash {
    remaining: f32,
    duration: f32,
}

impl DamageFlash {
    /// Starts a flicker lasting `duration` seconds.
    #[must_use]
    pub fn new(duration: f32) -> Self {
        let duration = duration.max(0.0);
        Self {
            remaining: duration,
            duration,
        }
    }

    /// Seconds left.
    #[must_use]
    pub const fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Counts down. Returns true once the flicker is over.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }

    /// Whether the sprite shows during the current segment.
    ///
    /// Segments alternate starting hidden, so a hit reads immediately.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn visible(&self, segment: f32) -> bool {
        let elapsed = (self.duration - self.remaining).max(0.0);
        let index = (elapsed / segment.max(f32::EPSILON)).floor() as u64;
        index % 2 == 1
    }
}

// =============================================================================
// AI
// =============================================================================

/// Wander state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WanderState {
    /// Standing still until the idle timer runs out
    Idle,
    /// Walking towards the current target
    Wandering,
}

/// Wander-around-a-home-point behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wander {
    origin: IVec2,
    radius: f32,
    min_idle: f32,
    max_idle: f32,
    speed: f32,
    pub(crate) state: WanderState,
    pub(crate) idle_timer: f32,
    pub(crate) target: IVec2,
}

impl Wander {
    /// Creates an idle wanderer whose first pause lasts `min_idle` seconds.
    ///
    /// `speed` is in pixels per second.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWander`] for a negative radius, a
    /// non-positive speed, or idle bounds that are negative or reversed.
    pub fn new(
        origin: IVec2,
        radius: f32,
        min_idle: f32,
        max_idle: f32,
        speed: f32,
    ) -> Result<Self, ConfigError> {
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(ConfigError::InvalidWander("radius must be finite and non-negative"));
        }
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ConfigError::InvalidWander("speed must be positive"));
        }
        if !(min_idle.is_finite() && max_idle.is_finite() && min_idle >= 0.0) {
            return Err(ConfigError::InvalidWander("idle bounds must be finite and non-negative"));
        }
        if min_idle > max_idle {
            return Err(ConfigError::InvalidWander("min idle exceeds max idle"));
        }
        Ok(Self {
            origin,
            radius,
            min_idle,
            max_idle,
            speed,
            state: WanderState::Idle,
            idle_timer: min_idle,
            target: origin,
        })
    }

    /// Fixed home point.
    #[must_use]
    pub const fn origin(&self) -> IVec2 {
        self.origin
    }

    /// Maximum roaming distance from the origin.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Walking speed in pixels per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Inclusive bounds for a fresh idle timer.
    #[must_use]
    pub const fn idle_bounds(&self) -> (f32, f32) {
        (self.min_idle, self.max_idle)
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> WanderState {
        self.state
    }

    /// Seconds left standing idle.
    #[must_use]
    pub const fn idle_timer(&self) -> f32 {
        self.idle_timer
    }

    /// Current walk target (the origin until the first pick).
    #[must_use]
    pub const fn target(&self) -> IVec2 {
        self.target
    }

    /// Returns true if `point` lies within the wander circle.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn contains(&self, point: IVec2) -> bool {
        let offset = (point - self.origin).as_vec2();
        offset.length_squared() <= self.radius * self.radius
    }
}

// =============================================================================
// Timers & visuals
// =============================================================================

/// Despawn timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    remaining: f32,
    initial: f32,
}

impl Lifetime {
    /// Creates a timer of `seconds`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLifetime`] unless `seconds` is positive.
    pub fn new(seconds: f32) -> Result<Self, ConfigError> {
        if !(seconds.is_finite() && seconds > 0.0) {
            return Err(ConfigError::InvalidLifetime(seconds));
        }
        Ok(Self {
            remaining: seconds,
            initial: seconds,
        })
    }

    /// Seconds left.
    #[must_use]
    pub const fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Starting duration.
    #[must_use]
    pub const fn initial(&self) -> f32 {
        self.initial
    }

    /// Counts down. Returns true once expired.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }

    /// Fraction of the lifetime elapsed, clamped to `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        (1.0 - self.remaining / self.initial).clamp(0.0, 1.0)
    }
}

/// Image currently drawn for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    /// Image handle from the frame provider
    pub image: ImageId,
    /// Drawn width in pixels
    pub width: i32,
    /// Drawn height in pixels; zero means unknown
    pub height: i32,
    /// Cleared while a damage flicker hides the sprite
    pub visible: bool,
}

impl Sprite {
    /// Creates a visible sprite.
    #[must_use]
    pub const fn new(image: ImageId, width: i32, height: i32) -> Self {
        Self {
            image,
            width,
            height,
            visible: true,
        }
    }
}

/// Pre-resolved corpse images, one per decay stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecaySprites {
    /// Stage 0 first
    pub stages: Vec<ImageId>,
}

/// Hit-burst particle with a toy vertical bounce.
///
/// `position` is the ground point; `height` lifts the drawn square above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Ground position in pixels
    pub position: Vec2,
    /// Horizontal drift in pixels per second
    pub drift: Vec2,
    /// Height above the ground in pixels
    pub height: f32,
    /// Upward speed in pixels per second
    pub vertical_speed: f32,
    /// Edge length of the drawn square
    pub size: i32,
    /// Packed RGBA colour
    pub color: u32,
}

impl Particle {
    /// Advances drift and the bounce model by `dt` seconds.
    pub fn step(&mut self, dt: f32, gravity: f32, restitution: f32) {
        self.position += self.drift * dt;
        self.vertical_speed -= gravity * dt;
        self.height += self.vertical_speed * dt;
        if self.height <= 0.0 {
            self.height = 0.0;
            self.vertical_speed = if self.vertical_speed < 0.0 {
                -self.vertical_speed * restitution
            } else {
                self.vertical_speed
            };
            self.drift *= restitution;
        }
    }
}

// =============================================================================
// Player & world interaction
// =============================================================================

/// Marks the entity driven by the input source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerControl {
    /// Walking speed in pixels per second before the stat modifier
    pub speed: f32,
}

/// Something the player can interact with.
#[derive(Debug, Clone, PartialEq)]
pub struct Interactable {
    /// Reach in pixels, measured from this entity's center
    pub radius: f32,
    /// Name reported in interaction events
    pub label: String,
}
