//! Frame clocks.
//!
//! The frame loop reads elapsed seconds from a [`Clock`] exactly once per
//! frame. [`FrameClock`] follows wall time; [`ManualClock`] is stepped by
//! hand for tests and offline captures.

use std::time::Instant;

/// Source of elapsed seconds since the loop started.
pub trait Clock {
    /// Seconds elapsed since the clock started.
    fn elapsed_seconds(&mut self) -> f32;
}

/// Wall clock that starts on its first sample, so the first frame reads 0.
#[derive(Debug, Default)]
pub struct FrameClock {
    start: Option<Instant>,
}

impl FrameClock {
    /// Creates a clock that has not started yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { start: None }
    }

    /// Whether the clock has been sampled at least once.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.start.is_some()
    }
}

impl Clock for FrameClock {
    fn elapsed_seconds(&mut self) -> f32 {
        let start = *self.start.get_or_insert_with(Instant::now);
        start.elapsed().as_secs_f32()
    }
}

/// Clock advanced explicitly by the caller.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ManualClock {
    now: f32,
}

impl ManualClock {
    /// Creates a clock reading `start` seconds.
    #[must_use]
    pub const fn new(start: f32) -> Self {
        Self { now: start }
    }

    /// Moves the clock forward by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.now += dt;
    }

    /// Sets the clock to an absolute reading.
    pub fn set(&mut self, seconds: f32) {
        self.now = seconds;
    }

    /// Current reading without counting as a frame sample.
    #[must_use]
    pub const fn now(&self) -> f32 {
        self.now
    }
}

impl Clock for ManualClock {
    fn elapsed_seconds(&mut self) -> f32 {
        self.now
    }
}
