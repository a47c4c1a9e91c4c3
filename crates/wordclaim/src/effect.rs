//! Side effects requested by the session.
//!
//! Session methods never touch clocks, tasks or channels. They return
//! [`Effect`]s and whoever drives the session (the runner, or a test)
//! carries them out before delivering the next input.

use crate::attempt::AttemptToken;
use crate::events::GameEvent;
use crate::timer::Generation;
use serde::{Deserialize, Serialize};

/// Which countdown a tick belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerSlot {
    /// The countdown before play begins.
    Pregame,
    /// The countdown of one attempt controller.
    Attempt(AttemptToken),
}

/// A side effect the session needs carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver a tick for `slot` tagged `generation` every unit, replacing
    /// any ticker already running for that slot kind.
    StartTicker {
        /// Countdown to drive.
        slot: TimerSlot,
        /// Generation to tag ticks with.
        generation: Generation,
    },
    /// Stop delivering ticks for `slot`.
    StopTicker {
        /// Countdown to stop.
        slot: TimerSlot,
    },
    /// Run the verification gateway for `word` and report back with `token`.
    Verify {
        /// Attempt the result belongs to.
        token: AttemptToken,
        /// Target word.
        word: String,
    },
    /// Abandon an in-flight verification.
    CancelVerification {
        /// Attempt the verification belonged to.
        token: AttemptToken,
    },
    /// Publish an event to presentation layers.
    Emit(GameEvent),
}

impl Effect {
    /// The event carried by an [`Effect::Emit`].
    pub fn event(&self) -> Option<&GameEvent> {
        match self {
            Effect::Emit(event) => Some(event),
            _ => None,
        }
    }
}
