//! Game rules for the word board.
//!
//! Pure functions over [`Board`](crate::Board) ownership. Turn and timing
//! rules live in the engine; this module only answers questions about
//! what is on the board.

pub mod win;

pub use win::{has_win, winning_line, Direction, WinLine};
