//! Fixed-timestep accumulator.
//!
//! Wall-clock deltas accumulate; every whole tick's worth runs one logical
//! update. A stall longer than `max_catch_up` ticks drops the excess backlog
//! rather than trying to simulate it all in one frame.

use tracing::warn;

/// Converts variable frame deltas into a count of fixed ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimestep {
    tick_dt: f64,
    accumulator: f64,
    max_catch_up: u32,
}

impl FixedTimestep {
    /// Creates an accumulator for ticks of `tick_dt` seconds.
    #[must_use]
    pub fn new(tick_dt: f32, max_catch_up: u32) -> Self {
        Self {
            tick_dt: f64::from(tick_dt),
            accumulator: 0.0,
            max_catch_up: max_catch_up.max(1),
        }
    }

    /// Seconds accumulated but not yet simulated.
    #[must_use]
    pub const fn pending(&self) -> f64 {
        self.accumulator
    }

    /// Adds `frame_delta` seconds and returns how many ticks are due.
    ///
    /// The accumulator keeps the remainder below one tick. Negative or
    /// non-finite deltas count as zero.
    pub fn accumulate(&mut self, frame_delta: f64) -> u32 {
        if frame_delta.is_finite() && frame_delta > 0.0 {
            self.accumulator += frame_delta;
        }
        let mut due = 0u32;
        while self.accumulator >= self.tick_dt {
            if due == self.max_catch_up {
                let dropped = self.accumulator;
                self.accumulator %= self.tick_dt;
                warn!(
                    dropped_seconds = dropped - self.accumulator,
                    max_catch_up = self.max_catch_up,
                    "simulation fell behind, dropping backlog"
                );
                break;
            }
            self.accumulator -= self.tick_dt;
            due += 1;
        }
        due
    }
}
