//! Per-tick signals between systems, and the outbound event log.
//!
//! Each inbound queue on [`EventBus`] has exactly one producer side and one
//! consumer system that drains it in FIFO order:
//!
//! | Queue          | Pushed by            | Drained by  |
//! |----------------|----------------------|-------------|
//! | `attacks`      | input, AI aggression | combat      |
//! | `interactions` | input                | interaction |
//! | `deaths`       | combat               | defeat      |
//! | `defeats`      | defeat               | experience  |
//! | `level_ups`    | experience           | stats       |
//!
//! [`EventBus::clear_transient`] runs at the end of every tick, so nothing
//! outlives the tick it was pushed in.
//!
//! The [`GameEvent`] log is separate: it accumulates for the host and is
//! drained with [`EventBus::take_log`].

use std::collections::VecDeque;
use std::mem;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::EntityId;

/// FIFO queue drained by a single consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct EventQueue<T> {
    items: VecDeque<T>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> EventQueue<T> {
    /// Appends an event.
    pub fn push(&mut self, event: T) {
        self.items.push_back(event);
    }

    /// Takes every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<T> {
        mem::take(&mut self.items).into()
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Queued events, oldest first, without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter()
    }

    fn clear(&mut self) -> usize {
        let dropped = self.items.len();
        self.items.clear();
        dropped
    }
}

/// An entity asked to swing its weapon this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRequested {
    /// The swinging entity
    pub attacker: EntityId,
}

/// An entity tried to interact with whatever is nearby.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionAttempted {
    /// The interacting entity
    pub actor: EntityId,
}

/// Health reached zero and the entity was marked dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Died {
    /// The corpse
    pub entity: EntityId,
    /// Who landed the final hit
    pub killer: EntityId,
}

/// A corpse ready to pay out experience.
#[derive(Debug, Clone, PartialEq)]
pub struct Defeated {
    /// The corpse
    pub entity: EntityId,
    /// Damage dealt per contributor, in id order
    pub participants: Vec<(EntityId, f32)>,
    /// Experience to share
    pub xp: u64,
}

/// One level gained. A multi-level grant pushes one per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    /// The levelling entity
    pub entity: EntityId,
    /// Level reached
    pub level: u32,
}

/// Something the host may want to show or record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    /// A swing connected.
    Hit {
        /// Swinging entity
        attacker: EntityId,
        /// Entity hit
        target: EntityId,
        /// Damage after mitigation
        damage: f32,
        /// Target health afterwards
        remaining: f32,
    },
    /// An entity died.
    Died {
        /// The corpse
        entity: EntityId,
        /// Final hit
        killer: EntityId,
    },
    /// An entity gained a level.
    LevelUp {
        /// The levelling entity
        entity: EntityId,
        /// Level reached
        level: u32,
    },
    /// An interaction found a target.
    Interacted {
        /// The interacting entity
        actor: EntityId,
        /// What it interacted with
        target: EntityId,
        /// Target label
        label: String,
    },
    /// An attack could not start for lack of animation frames.
    AttackAborted {
        /// The entity whose attack was dropped
        entity: EntityId,
    },
    /// A timed entity expired and was destroyed.
    Despawned {
        /// The destroyed entity
        entity: EntityId,
    },
}

/// All per-tick queues plus the outbound log.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    /// Attack requests for combat
    pub attacks: EventQueue<AttackRequested>,
    /// Interaction attempts
    pub interactions: EventQueue<InteractionAttempted>,
    /// Deaths awaiting the defeat step
    pub deaths: EventQueue<Died>,
    /// Corpses awaiting experience payout
    pub defeats: EventQueue<Defeated>,
    /// Level-ups awaiting stat recalculation
    pub level_ups: EventQueue<LevelUp>,
    log: Vec<GameEvent>,
}

impl EventBus {
    /// Appends to the outbound log.
    pub fn emit(&mut self, event: GameEvent) {
        self.log.push(event);
    }

    /// Outbound events recorded since the last [`take_log`](Self::take_log).
    #[must_use]
    pub fn log(&self) -> &[GameEvent] {
        &self.log
    }

    /// Drains the outbound log.
    pub fn take_log(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.log)
    }

    /// Empties every inbound queue. The outbound log is kept.
    pub fn clear_transient(&mut self) {
        let dropped = self.attacks.clear()
            + self.interactions.clear()
            + self.deaths.clear()
            + self.defeats.clear()
            + self.level_ups.clear();
        if dropped > 0 {
            debug!(dropped, "cleared undrained events at end of tick");
        }
    }
}
