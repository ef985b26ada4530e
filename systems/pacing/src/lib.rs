#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-rate tick pacing for frame-driven adapters.
//!
//! Adapters report how much wall-clock time each frame consumed; the pacer
//! answers how many simulation ticks are due and how long the adapter should
//! sleep before the next frame when it drives its own loop.

use std::time::Duration;

use log::debug;
use thiserror::Error;

/// Ticks per second used when no explicit rate is configured.
pub const DEFAULT_TICK_RATE: u32 = 30;

/// Upper bound on ticks run in a single frame after a stall.
pub const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 5;

/// Reasons a pacer cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PacingError {
    /// A rate of zero ticks per second never advances the simulation.
    #[error("tick rate must be at least one tick per second")]
    ZeroTickRate,
}

/// Converts frame durations into a steady stream of simulation ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickPacer {
    tick_duration: Duration,
    accumulator: Duration,
    max_ticks_per_frame: u32,
}

impl TickPacer {
    /// Creates a pacer targeting `ticks_per_second`.
    pub fn new(ticks_per_second: u32) -> Result<Self, PacingError> {
        if ticks_per_second == 0 {
            return Err(PacingError::ZeroTickRate);
        }
        Ok(Self {
            tick_duration: Duration::from_secs(1) / ticks_per_second,
            accumulator: Duration::ZERO,
            max_ticks_per_frame: DEFAULT_MAX_TICKS_PER_FRAME,
        })
    }

    /// Caps the number of ticks a single frame may run; values below one become one.
    #[must_use]
    pub fn with_max_ticks_per_frame(mut self, max_ticks_per_frame: u32) -> Self {
        self.max_ticks_per_frame = max_ticks_per_frame.max(1);
        self
    }

    /// Simulated time covered by one tick.
    #[must_use]
    pub const fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Accumulates `frame_time` and returns how many ticks are now due.
    ///
    /// Whole ticks beyond the per-frame cap are discarded so that a long
    /// stall does not trigger an ever-growing catch-up burst.
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.accumulator = self.accumulator.saturating_add(frame_time);

        let mut due = 0;
        while self.accumulator >= self.tick_duration && due < self.max_ticks_per_frame {
            self.accumulator -= self.tick_duration;
            due += 1;
        }

        if self.accumulator >= self.tick_duration {
            let backlog = self.accumulator;
            let remainder = backlog.as_nanos() % self.tick_duration.as_nanos();
            self.accumulator = Duration::from_nanos(u64::try_from(remainder).unwrap_or(0));
            debug!("dropped {backlog:?} of tick backlog after running {due} ticks");
        }

        due
    }

    /// Remaining delay before the next frame when this one took `frame_time`.
    ///
    /// Frames that overrun the tick budget start the next frame immediately.
    #[must_use]
    pub fn delay_after(&self, frame_time: Duration) -> Duration {
        self.tick_duration.saturating_sub(frame_time)
    }
}

impl Default for TickPacer {
    fn default() -> Self {
        Self {
            tick_duration: Duration::from_secs(1) / DEFAULT_TICK_RATE,
            accumulator: Duration::ZERO,
            max_ticks_per_frame: DEFAULT_MAX_TICKS_PER_FRAME,
        }
    }
}
