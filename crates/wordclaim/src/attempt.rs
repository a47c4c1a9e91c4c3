//! Lifecycle of one cell-claim attempt.
//!
//! An [`AttemptController`] is created when a player selects a cell and is
//! discarded once it reaches [`AttemptPhase::Success`],
//! [`AttemptPhase::Exhausted`] or [`AttemptPhase::Aborted`]. Each timed
//! try races its countdown against a verification result; whichever the
//! controller sees first decides the try and the other is ignored.

use crate::timer::{Countdown, Generation, Tick};
use crate::verification::{Outcome, VerificationUnsupported};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use wordclaim_rules::Position;

/// Liveness token of one attempt controller.
///
/// Tokens increase monotonically within a session. Ticks and verification
/// results carry the token they were issued for and are dropped when it no
/// longer names the active controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[display("attempt#{}", _0)]
pub struct AttemptToken(u64);

impl AttemptToken {
    /// The first token a session hands out.
    pub fn first() -> Self {
        Self(1)
    }

    /// The token after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Where an attempt controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum AttemptPhase {
    /// Countdown running, waiting for the player to speak.
    #[display("awaiting input")]
    AwaitingInput,
    /// Countdown paused, verification in flight.
    #[display("verifying")]
    Verifying,
    /// The word was verified; terminal.
    #[display("success")]
    Success,
    /// Every try failed; terminal.
    #[display("exhausted")]
    Exhausted,
    /// Cancelled by reset; terminal.
    #[display("aborted")]
    Aborted,
}

impl AttemptPhase {
    /// Whether the controller can no longer change.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AttemptPhase::Success | AttemptPhase::Exhausted | AttemptPhase::Aborted
        )
    }
}

/// Why a single try failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum FailureReason {
    /// Something was heard but it was not the word.
    #[display("Wrong. Try again.")]
    NotMatched,
    /// Nothing was heard.
    #[display("No audio detected.")]
    NoInput,
    /// The recognizer failed.
    #[display("Recogniser error. Try again.")]
    RecognizerError,
    /// The countdown ran out before the player submitted.
    #[display("Time out. Try again.")]
    Timeout,
}

impl FailureReason {
    /// Maps a non-matching outcome to its failure reason.
    pub fn from_outcome(outcome: Outcome) -> Option<Self> {
        match outcome {
            Outcome::Matched => None,
            Outcome::NotMatched => Some(FailureReason::NotMatched),
            Outcome::NoInput => Some(FailureReason::NoInput),
            Outcome::Error => Some(FailureReason::RecognizerError),
        }
    }
}

/// What an input did to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStep {
    /// Stale, out of phase, or otherwise irrelevant.
    Ignored,
    /// The countdown advanced.
    Ticked {
        /// Units left in this try.
        remaining: u32,
    },
    /// A try failed and a fresh one started.
    Retrying {
        /// Why the try failed.
        reason: FailureReason,
        /// Tries consumed so far.
        attempts_used: u8,
        /// Generation of the fresh countdown.
        generation: Generation,
    },
    /// The word was verified.
    Succeeded,
    /// The last try failed.
    Exhausted {
        /// Why the last try failed.
        reason: FailureReason,
    },
    /// Verification is unavailable; back to awaiting input with the
    /// countdown resumed and nothing consumed.
    Unsupported {
        /// Units left in this try.
        remaining: u32,
    },
}

/// Runs the timed tries for one selected cell.
#[derive(Debug, Clone)]
pub struct AttemptController {
    token: AttemptToken,
    position: Position,
    word: String,
    max_attempts: u8,
    timeout: u32,
    attempts_used: u8,
    phase: AttemptPhase,
    countdown: Countdown,
}

impl AttemptController {
    /// Opens a controller in [`AttemptPhase::AwaitingInput`] with its
    /// countdown started.
    ///
    /// Returns the generation ticks must be tagged with.
    #[instrument(skip_all, fields(%token, %position))]
    pub fn open(
        token: AttemptToken,
        position: Position,
        word: impl Into<String>,
        max_attempts: u8,
        timeout: u32,
    ) -> (Self, Generation) {
        let mut countdown = Countdown::new();
        let generation = countdown.start(timeout);
        let controller = Self {
            token,
            position,
            word: word.into(),
            max_attempts,
            timeout,
            attempts_used: 0,
            phase: AttemptPhase::AwaitingInput,
            countdown,
        };
        debug!(word = %controller.word, "Attempt opened");
        (controller, generation)
    }

    /// Player spoke: pause the countdown and start verifying.
    ///
    /// Returns false, changing nothing, unless awaiting input.
    pub fn submit(&mut self) -> bool {
        if self.phase != AttemptPhase::AwaitingInput {
            debug!(token = %self.token, phase = %self.phase, "Submit ignored");
            return false;
        }
        self.countdown.pause();
        self.phase = AttemptPhase::Verifying;
        true
    }

    /// Applies one countdown tick.
    pub fn on_tick(&mut self, generation: Generation) -> AttemptStep {
        if self.phase != AttemptPhase::AwaitingInput {
            return AttemptStep::Ignored;
        }
        match self.countdown.tick(generation) {
            Tick::Ignored => AttemptStep::Ignored,
            Tick::Counting(remaining) => AttemptStep::Ticked { remaining },
            Tick::Expired => self.fail(FailureReason::Timeout),
        }
    }

    /// Applies the gateway's answer for the current try.
    #[instrument(skip(self), fields(token = %self.token, attempts_used = self.attempts_used))]
    pub fn on_verification(
        &mut self,
        result: Result<Outcome, VerificationUnsupported>,
    ) -> AttemptStep {
        if self.phase != AttemptPhase::Verifying {
            debug!(phase = %self.phase, "Late verification result ignored");
            return AttemptStep::Ignored;
        }

        match result {
            Err(VerificationUnsupported) => {
                self.phase = AttemptPhase::AwaitingInput;
                self.countdown.resume();
                AttemptStep::Unsupported {
                    remaining: self.countdown.remaining(),
                }
            }
            Ok(outcome) => match FailureReason::from_outcome(outcome) {
                None => {
                    self.countdown.stop();
                    self.phase = AttemptPhase::Success;
                    info!(position = %self.position, "Word verified");
                    AttemptStep::Succeeded
                }
                Some(reason) => self.fail(reason),
            },
        }
    }

    /// Cancels the controller. No effect once terminal.
    pub fn abort(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.countdown.stop();
        self.phase = AttemptPhase::Aborted;
        debug!(token = %self.token, "Attempt aborted");
    }

    fn fail(&mut self, reason: FailureReason) -> AttemptStep {
        self.attempts_used += 1;
        if self.attempts_used >= self.max_attempts {
            self.countdown.stop();
            self.phase = AttemptPhase::Exhausted;
            info!(token = %self.token, %reason, "Attempts exhausted");
            AttemptStep::Exhausted { reason }
        } else {
            let generation = self.countdown.start(self.timeout);
            self.phase = AttemptPhase::AwaitingInput;
            debug!(token = %self.token, %reason, attempts_used = self.attempts_used, "Retrying");
            AttemptStep::Retrying {
                reason,
                attempts_used: self.attempts_used,
                generation,
            }
        }
    }

    /// Liveness token.
    pub fn token(&self) -> AttemptToken {
        self.token
    }

    /// The selected cell.
    pub fn position(&self) -> Position {
        self.position
    }

    /// The word to be spoken.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Tries consumed so far.
    pub fn attempts_used(&self) -> u8 {
        self.attempts_used
    }

    /// One-based number of the current try.
    pub fn attempt_number(&self) -> u8 {
        self.attempts_used.saturating_add(1).min(self.max_attempts)
    }

    /// Tries allowed on this cell.
    pub fn max_attempts(&self) -> u8 {
        self.max_attempts
    }

    /// Units left in the current try.
    pub fn remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    /// Generation of the current countdown run.
    pub fn generation(&self) -> Generation {
        self.countdown.generation()
    }

    /// Current phase.
    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    /// Whether the controller still accepts input.
    pub fn is_active(&self) -> bool {
        !self.phase.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> (AttemptController, Generation) {
        AttemptController::open(
            AttemptToken::first(),
            Position::new(0, 0).unwrap(),
            "苹果",
            3,
            5,
        )
    }

    #[test]
    fn test_match_succeeds() {
        let (mut attempt, _) = open();
        assert!(attempt.submit());
        assert_eq!(attempt.phase(), AttemptPhase::Verifying);
        assert_eq!(attempt.on_verification(Ok(Outcome::Matched)), AttemptStep::Succeeded);
        assert_eq!(attempt.phase(), AttemptPhase::Success);
        assert_eq!(attempt.attempts_used(), 0);
    }

    #[test]
    fn test_attempt_number_at_u8_limit() {
        let (mut attempt, _) = AttemptController::open(
            AttemptToken::first(),
            Position::new(0, 0).unwrap(),
            "苹果",
            u8::MAX,
            5,
        );
        for _ in 0..u8::MAX {
            attempt.submit();
            attempt.on_verification(Ok(Outcome::NotMatched));
        }
        assert_eq!(attempt.phase(), AttemptPhase::Exhausted);
        assert_eq!(attempt.attempts_used(), u8::MAX);
        assert_eq!(attempt.attempt_number(), u8::MAX);
    }

    #[test]
    fn test_every_failure_kind_consumes_one_attempt() {
        let (mut attempt, _) = open();
        for outcome in [Outcome::NotMatched, Outcome::NoInput] {
            attempt.submit();
            assert!(matches!(
                attempt.on_verification(Ok(outcome)),
                AttemptStep::Retrying { .. }
            ));
        }
        attempt.submit();
        assert_eq!(
            attempt.on_verification(Ok(Outcome::Error)),
            AttemptStep::Exhausted {
                reason: FailureReason::RecognizerError
            }
        );
        assert_eq!(attempt.attempts_used(), 3);
        assert_eq!(attempt.phase(), AttemptPhase::Exhausted);
    }

    #[test]
    fn test_timeout_restarts_countdown() {
        let (mut attempt, generation) = open();
        for remaining in (1..5).rev() {
            assert_eq!(attempt.on_tick(generation), AttemptStep::Ticked { remaining });
        }
        let step = attempt.on_tick(generation);
        let AttemptStep::Retrying {
            reason,
            attempts_used,
            generation: fresh,
        } = step
        else {
            panic!("expected retry, got {:?}", step);
        };
        assert_eq!(reason, FailureReason::Timeout);
        assert_eq!(attempts_used, 1);
        assert_ne!(fresh, generation);
        assert_eq!(attempt.remaining(), 5);

        // Ticks for the expired run do nothing.
        assert_eq!(attempt.on_tick(generation), AttemptStep::Ignored);
    }

    #[test]
    fn test_countdown_paused_while_verifying() {
        let (mut attempt, generation) = open();
        attempt.on_tick(generation);
        attempt.submit();
        assert_eq!(attempt.on_tick(generation), AttemptStep::Ignored);
        assert_eq!(attempt.remaining(), 4);
    }

    #[test]
    fn test_unsupported_resumes_without_consuming() {
        let (mut attempt, generation) = open();
        attempt.on_tick(generation);
        attempt.submit();
        assert_eq!(
            attempt.on_verification(Err(VerificationUnsupported)),
            AttemptStep::Unsupported { remaining: 4 }
        );
        assert_eq!(attempt.phase(), AttemptPhase::AwaitingInput);
        assert_eq!(attempt.attempts_used(), 0);
        assert_eq!(attempt.on_tick(generation), AttemptStep::Ticked { remaining: 3 });
    }

    #[test]
    fn test_result_outside_verifying_is_ignored() {
        let (mut attempt, _) = open();
        assert_eq!(attempt.on_verification(Ok(Outcome::Matched)), AttemptStep::Ignored);
        assert_eq!(attempt.phase(), AttemptPhase::AwaitingInput);
    }

    #[test]
    fn test_abort_is_terminal() {
        let (mut attempt, generation) = open();
        attempt.submit();
        attempt.abort();
        assert_eq!(attempt.phase(), AttemptPhase::Aborted);
        assert!(!attempt.submit());
        assert_eq!(attempt.on_verification(Ok(Outcome::Matched)), AttemptStep::Ignored);
        assert_eq!(attempt.on_tick(generation), AttemptStep::Ignored);
    }
}
