//! Board coordinates.

use super::{BoardError, BOARD_CELLS, BOARD_SIDE};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A cell coordinate on the 10×10 board.
///
/// Positions are always in range; construction goes through
/// [`Position::new`] or [`Position::from_index`], both of which reject
/// anything off the board. Deserialization applies the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

#[derive(Deserialize)]
struct RawPosition {
    row: usize,
    col: usize,
}

impl TryFrom<RawPosition> for Position {
    type Error = BoardError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Self::new(raw.row, raw.col).ok_or(BoardError::OffBoard(raw.row, raw.col))
    }
}

impl Position {
    /// Creates a position from a row and column (0-9 each).
    #[instrument]
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIDE && col < BOARD_SIDE {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Creates a position from a row-major index (0-99).
    #[instrument]
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_CELLS {
            Self::new(index / BOARD_SIDE, index % BOARD_SIDE)
        } else {
            None
        }
    }

    /// Row-major index (0-99).
    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIDE + self.col as usize
    }

    /// Row (0-9).
    pub fn row(self) -> usize {
        self.row as usize
    }

    /// Column (0-9).
    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Steps by a signed offset, returning `None` when leaving the board.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Self> {
        let row = self.row as isize + d_row;
        let col = self.col as isize + d_col;
        if row < 0 || col < 0 {
            return None;
        }
        Self::new(row as usize, col as usize)
    }

    /// Every position in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_CELLS).filter_map(Self::from_index)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip_corners() {
        assert_eq!(Position::from_index(0), Position::new(0, 0));
        assert_eq!(Position::from_index(9), Position::new(0, 9));
        assert_eq!(Position::from_index(90), Position::new(9, 0));
        assert_eq!(Position::new(9, 9).map(Position::index), Some(99));
    }

    #[test]
    fn test_off_board_rejected() {
        assert_eq!(Position::from_index(100), None);
        assert_eq!(Position::new(10, 0), None);
        assert_eq!(Position::new(0, 10), None);
    }

    #[test]
    fn test_offset_stops_at_edges() {
        let corner = Position::new(0, 0).unwrap();
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(1, 1), Position::new(1, 1));
        let far = Position::new(9, 9).unwrap();
        assert_eq!(far.offset(0, 1), None);
    }

    #[test]
    fn test_deserialize_checks_range() {
        let pos: Position = serde_json::from_str(r#"{"row":9,"col":3}"#).unwrap();
        assert_eq!(Some(pos), Position::new(9, 3));

        let err = serde_json::from_str::<Position>(r#"{"row":200,"col":0}"#).unwrap_err();
        assert!(err.to_string().contains("off the board"));
    }

    #[test]
    fn test_all_covers_board() {
        assert_eq!(Position::all().count(), BOARD_CELLS);
    }
}
