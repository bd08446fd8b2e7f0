//! Frame provider collaborator.
//!
//! The core never decodes images. Hosts resolve sprite sheets once at startup
//! into opaque [`ImageId`] handles and hand the simulation a
//! [`FrameProvider`] by reference.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tilegrid::Rect;

/// Opaque handle to a pre-decoded image owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageId(u32);

impl ImageId {
    /// Wraps a host-assigned handle.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw handle.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Weapon or effect whose attack animation an entity plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Bare hands
    Unarmed,
    /// One-handed blade
    Sword,
    /// Creature bite or claw
    Claw,
}

/// Attack animation for one weapon, indexed `[direction][frame]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttackFrameSet {
    /// Images per direction
    pub frames: [Vec<ImageId>; 4],
    /// Hitbox rectangles per direction and frame, relative to the entity
    pub hitboxes: [Vec<Vec<Rect>>; 4],
    /// Seconds each frame is shown
    pub frame_duration: f32,
    /// Frames the sequence plays
    pub total_frames: usize,
}

/// Source of attack animations.
pub trait FrameProvider {
    /// Returns the attack frames for `weapon`, if any were loaded.
    fn attack_frames(&self, weapon: WeaponKind) -> Option<&AttackFrameSet>;
}

/// In-memory frame provider.
#[derive(Debug, Clone, Default)]
pub struct FrameLibrary {
    attacks: HashMap<WeaponKind, AttackFrameSet>,
}

impl FrameLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the attack animation for a weapon, replacing any previous one.
    pub fn insert_attack(&mut self, weapon: WeaponKind, frames: AttackFrameSet) {
        self.attacks.insert(weapon, frames);
    }
}

impl FrameProvider for FrameLibrary {
    fn attack_frames(&self, weapon: WeaponKind) -> Option<&AttackFrameSet> {
        self.attacks.get(&weapon)
    }
}
