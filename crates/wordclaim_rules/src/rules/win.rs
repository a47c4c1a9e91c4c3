//! Win detection: five or more consecutive cells owned by one player.

use super::super::{Board, Player, Position, WIN_LENGTH};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::instrument;

/// Direction a winning line runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum Direction {
    /// Along a row, left to right.
    Row,
    /// Down a column.
    Column,
    /// Down and to the right.
    DownRight,
    /// Up and to the right.
    UpRight,
}

impl Direction {
    fn step(self) -> (isize, isize) {
        match self {
            Direction::Row => (0, 1),
            Direction::Column => (1, 0),
            Direction::DownRight => (1, 1),
            Direction::UpRight => (-1, 1),
        }
    }
}

/// The first five cells of a detected winning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLine {
    /// Where the run starts.
    pub start: Position,
    /// Which way it runs.
    pub direction: Direction,
}

impl WinLine {
    /// The five positions of the line, in order.
    pub fn positions(&self) -> Vec<Position> {
        let (dr, dc) = self.direction.step();
        (0..WIN_LENGTH as isize)
            .filter_map(|k| self.start.offset(dr * k, dc * k))
            .collect()
    }
}

/// Finds a run of [`WIN_LENGTH`] cells owned by `player`.
///
/// Scans rows, then columns, then down-right and up-right diagonals and
/// returns the first run found. Diagonals shorter than five can never
/// qualify, so starting points whose run would leave the board are
/// rejected by the bounds check.
#[instrument(skip(board))]
pub fn winning_line(board: &Board, player: Player) -> Option<WinLine> {
    for direction in Direction::iter() {
        for start in Position::all() {
            if run_from(board, player, start, direction) {
                return Some(WinLine { start, direction });
            }
        }
    }

    None
}

/// Whether `player` owns five or more consecutive cells in any direction.
pub fn has_win(board: &Board, player: Player) -> bool {
    winning_line(board, player).is_some()
}

fn run_from(board: &Board, player: Player, start: Position, direction: Direction) -> bool {
    let (dr, dc) = direction.step();
    (0..WIN_LENGTH as isize).all(|k| {
        start
            .offset(dr * k, dc * k)
            .is_some_and(|pos| board.owner(pos) == Some(player))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::from_words((0..100).map(|i| format!("w{i}"))).unwrap()
    }

    fn claim_run(board: &mut Board, player: Player, start: (usize, usize), dir: Direction, len: usize) {
        let (dr, dc) = dir.step();
        let start = Position::new(start.0, start.1).unwrap();
        for k in 0..len as isize {
            let pos = start.offset(dr * k, dc * k).unwrap();
            board.claim(pos, player).unwrap();
        }
    }

    #[test]
    fn test_no_winner_empty_board() {
        let board = board();
        assert!(!has_win(&board, Player::Player1));
        assert!(!has_win(&board, Player::Player2));
    }

    #[test]
    fn test_run_of_four_never_wins() {
        let cases = [
            ((2, 3), Direction::Row),
            ((1, 7), Direction::Column),
            ((0, 0), Direction::DownRight),
            ((9, 0), Direction::UpRight),
        ];
        for (start, dir) in cases {
            let mut board = board();
            claim_run(&mut board, Player::Player1, start, dir, 4);
            assert!(!has_win(&board, Player::Player1), "{dir:?} run of 4 won");
        }
    }

    #[test]
    fn test_run_of_five_wins_each_direction() {
        let cases = [
            ((2, 3), Direction::Row),
            ((1, 7), Direction::Column),
            ((5, 5), Direction::DownRight),
            ((4, 0), Direction::UpRight),
        ];
        for (start, dir) in cases {
            let mut board = board();
            claim_run(&mut board, Player::Player2, start, dir, 5);
            assert!(has_win(&board, Player::Player2), "{dir:?} run of 5 missed");
            assert!(!has_win(&board, Player::Player1));
        }
    }

    #[test]
    fn test_run_of_six_wins() {
        let mut board = board();
        claim_run(&mut board, Player::Player1, (9, 4), Direction::Row, 6);
        assert!(has_win(&board, Player::Player1));
    }

    #[test]
    fn test_opponent_cell_breaks_run() {
        let mut board = board();
        claim_run(&mut board, Player::Player1, (0, 0), Direction::Row, 2);
        board.claim(Position::new(0, 2).unwrap(), Player::Player2).unwrap();
        claim_run(&mut board, Player::Player1, (0, 3), Direction::Row, 3);
        assert!(!has_win(&board, Player::Player1));
    }

    #[test]
    fn test_row_does_not_wrap() {
        let mut board = board();
        claim_run(&mut board, Player::Player1, (0, 7), Direction::Row, 3);
        claim_run(&mut board, Player::Player1, (1, 0), Direction::Row, 2);
        assert!(!has_win(&board, Player::Player1));
    }

    #[test]
    fn test_winning_line_reports_positions() {
        let mut board = board();
        claim_run(&mut board, Player::Player1, (5, 1), Direction::UpRight, 5);
        let line = winning_line(&board, Player::Player1).unwrap();
        assert_eq!(line.direction, Direction::UpRight);
        assert_eq!(line.positions().len(), 5);
        assert!(line
            .positions()
            .iter()
            .all(|&p| board.owner(p) == Some(Player::Player1)));
    }
}
