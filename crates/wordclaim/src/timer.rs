//! Tick-driven countdown timer.
//!
//! A [`Countdown`] does not own a clock. Something outside (the session
//! runner, or a test) delivers ticks tagged with the [`Generation`] they
//! were scheduled for, and the countdown decides what each tick means.
//! Restarting bumps the generation, so every tick still in flight for an
//! earlier run is ignored.

use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

/// Identifies one run of a countdown.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[display("gen{}", _0)]
pub struct Generation(u64);

/// Whether a countdown is counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerState {
    /// Never started, stopped, or already expired.
    Idle,
    /// Counting down.
    Running,
    /// Frozen at the remaining count.
    Paused,
}

/// What a delivered tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Wrong generation, paused, or idle.
    Ignored,
    /// One unit elapsed; this many remain.
    Counting(u32),
    /// Reached zero. Reported once per start.
    Expired,
}

/// A cancelable, pausable countdown measured in whole units.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: u32,
    state: TimerState,
    generation: Generation,
}

impl Countdown {
    /// Creates an idle countdown.
    pub fn new() -> Self {
        Self {
            remaining: 0,
            state: TimerState::Idle,
            generation: Generation::default(),
        }
    }

    /// Starts counting down from `units`, cancelling any earlier run.
    ///
    /// Returns the generation the caller must tag ticks with.
    #[instrument(skip(self), fields(previous = %self.generation))]
    pub fn start(&mut self, units: u32) -> Generation {
        self.generation = Generation(self.generation.0 + 1);
        self.remaining = units;
        self.state = TimerState::Running;
        self.generation
    }

    /// Freezes the remaining count. No effect unless running.
    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    /// Continues from the frozen count. No effect unless paused.
    pub fn resume(&mut self) {
        if self.state == TimerState::Paused {
            self.state = TimerState::Running;
        }
    }

    /// Cancels the current run. Idempotent.
    pub fn stop(&mut self) {
        self.state = TimerState::Idle;
    }

    /// Applies one elapsed unit scheduled for `generation`.
    pub fn tick(&mut self, generation: Generation) -> Tick {
        if generation != self.generation || self.state != TimerState::Running {
            trace!(%generation, current = %self.generation, state = ?self.state, "Tick ignored");
            return Tick::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TimerState::Idle;
            Tick::Expired
        } else {
            Tick::Counting(self.remaining)
        }
    }

    /// Units left in the current run.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Current state.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Generation of the latest run.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether the countdown is actively counting.
    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}
