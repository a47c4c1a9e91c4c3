//! Pure rules for the wordclaim board.
//!
//! This crate owns the 10×10 word board, cell ownership and the
//! five-in-a-line win check. It has no notion of time, turns or speech;
//! those live in the `wordclaim` engine crate.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod pool;
mod position;
mod rules;
mod types;

pub use error::BoardError;
pub use pool::WordPool;
pub use position::Position;
pub use rules::{has_win, winning_line, Direction, WinLine};
pub use types::{Board, Cell, Player};

/// Cells along one side of the board.
pub const BOARD_SIDE: usize = 10;

/// Total number of cells on the board.
pub const BOARD_CELLS: usize = BOARD_SIDE * BOARD_SIDE;

/// Consecutive owned cells needed to win.
pub const WIN_LENGTH: usize = 5;

/// Timed attempts a player gets on one selected cell.
pub const MAX_ATTEMPTS_PER_CELL: u8 = 3;

/// Exhausted cells allowed in one turn before the turn passes.
pub const MAX_CELLS_PER_TURN: u8 = 2;

/// Length of one attempt countdown, in time units.
pub const ATTEMPT_TIMEOUT_UNITS: u32 = 5;

/// Length of the countdown before play begins, in time units.
pub const PREGAME_COUNTDOWN_UNITS: u32 = 3;
