//! Board errors.

use super::{Player, Position, BOARD_CELLS};

/// Error that can occur when building or mutating a board.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// The word pool cannot fill every cell.
    #[display("Word pool has {} words, need at least {}", _0, BOARD_CELLS)]
    InsufficientWordPool(usize),

    /// The cell already belongs to a player.
    #[display("Cell {} is already owned by {}", _0, _1)]
    AlreadyOwned(Position, Player),

    /// Index outside 0..100.
    #[display("Cell index {} is off the board", _0)]
    OutOfRange(usize),

    /// Row or column outside 0..10.
    #[display("Position ({}, {}) is off the board", _0, _1)]
    OffBoard(usize, usize),

    /// A board must hold exactly 100 cells.
    #[display("Board has {} cells, expected {}", _0, BOARD_CELLS)]
    WrongCellCount(usize),
}

impl std::error::Error for BoardError {}
