//! Session and word-source errors.

use derive_more::{Display, Error};
use tracing::instrument;
use wordclaim_rules::{Position, BOARD_CELLS};

/// A session-level action was refused.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SessionError {
    /// No board can be built from the pool.
    #[display("Word pool has {} words, need at least {}", _0, BOARD_CELLS)]
    InsufficientWordPool(usize),

    /// `start` outside the not-started state.
    #[display("Game already started")]
    AlreadyStarted,

    /// The action is not allowed while a game is starting or running.
    #[display("Not allowed while a game is in progress")]
    GameInProgress,
}

impl std::error::Error for SessionError {}

/// A cell selection was rejected. The session is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SelectionError {
    /// No game is in progress.
    #[display("No game in progress")]
    NotInProgress,

    /// Another attempt is active or the turn has not begun.
    #[display("Board is locked")]
    Locked,

    /// The cell already has an owner.
    #[display("Cell {} is already claimed", _0)]
    AlreadyOwned(Position),

    /// Index outside the board.
    #[display("Cell index {} is off the board", _0)]
    OutOfRange(usize),
}

impl std::error::Error for SelectionError {}

/// Failure loading a word pool from disk.
#[derive(Debug, Clone, Display, Error)]
#[display("Word source error: {} at {}:{}", message, file, line)]
pub struct WordSourceError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl WordSourceError {
    /// Creates a new word source error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
