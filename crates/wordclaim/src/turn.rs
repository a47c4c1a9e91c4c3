//! Whose turn it is, the per-turn failure budget, and the selection lock.

use crate::error::SelectionError;
use tracing::{debug, info, instrument};
use wordclaim_rules::{winning_line, Board, BoardError, Player, Position, WinLine};

/// What happened to the turn after an attempt resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDecision {
    /// The claim completed a line. The board stays locked.
    Won {
        /// The winner.
        player: Player,
        /// The completed line.
        line: WinLine,
    },
    /// The same player selects again.
    Continues {
        /// The acting player.
        player: Player,
        /// Exhausted cells so far this turn.
        failed_cells: u8,
    },
    /// The other player's turn begins.
    Passed {
        /// Previous player.
        from: Player,
        /// Next player.
        to: Player,
    },
}

/// Tracks the current player and gates cell selection.
#[derive(Debug, Clone)]
pub struct TurnController {
    current: Player,
    failed_cells: u8,
    max_cells_per_turn: u8,
    locked: bool,
}

impl TurnController {
    /// Creates a locked controller with Player 1 to act.
    pub fn new(max_cells_per_turn: u8) -> Self {
        Self {
            current: Player::Player1,
            failed_cells: 0,
            max_cells_per_turn,
            locked: true,
        }
    }

    /// Unlocks selection for the current player.
    pub fn begin_turn(&mut self) -> Player {
        self.locked = false;
        debug!(player = %self.current, "Turn begins");
        self.current
    }

    /// Accepts a selection and locks the board.
    ///
    /// # Errors
    ///
    /// Rejects without any state change when locked or when the cell is
    /// owned.
    #[instrument(skip(self, board), fields(player = %self.current))]
    pub fn select(&mut self, board: &Board, pos: Position) -> Result<Player, SelectionError> {
        if self.locked {
            debug!("Selection rejected: locked");
            return Err(SelectionError::Locked);
        }
        if board.owner(pos).is_some() {
            debug!("Selection rejected: owned");
            return Err(SelectionError::AlreadyOwned(pos));
        }
        self.locked = true;
        Ok(self.current)
    }

    /// Claims `pos` for the current player and decides what follows.
    ///
    /// On a win the player does not switch and the board stays locked.
    /// Otherwise the failure counter resets and the turn passes.
    #[instrument(skip(self, board), fields(player = %self.current))]
    pub fn on_success(&mut self, board: &mut Board, pos: Position) -> Result<TurnDecision, BoardError> {
        let player = self.current;
        board.claim(pos, player)?;

        if let Some(line) = winning_line(board, player) {
            info!(%player, "Line completed");
            return Ok(TurnDecision::Won { player, line });
        }

        self.failed_cells = 0;
        Ok(self.pass())
    }

    /// Counts an exhausted cell and decides whether the turn passes.
    #[instrument(skip(self), fields(player = %self.current, failed_cells = self.failed_cells))]
    pub fn on_exhausted(&mut self) -> TurnDecision {
        self.failed_cells += 1;
        if self.failed_cells >= self.max_cells_per_turn {
            self.failed_cells = 0;
            return self.pass();
        }

        self.locked = false;
        TurnDecision::Continues {
            player: self.current,
            failed_cells: self.failed_cells,
        }
    }

    /// Back to Player 1, counter zero, locked.
    pub fn reset(&mut self) {
        self.current = Player::Player1;
        self.failed_cells = 0;
        self.locked = true;
    }

    fn pass(&mut self) -> TurnDecision {
        let from = self.current;
        self.current = from.opponent();
        self.locked = false;
        info!(%from, to = %self.current, "Turn passed");
        TurnDecision::Passed {
            from,
            to: self.current,
        }
    }

    /// The player to act.
    pub fn current(&self) -> Player {
        self.current
    }

    /// Exhausted cells so far this turn.
    pub fn failed_cells(&self) -> u8 {
        self.failed_cells
    }

    /// Exhausted cells allowed before the turn passes.
    pub fn max_cells_per_turn(&self) -> u8 {
        self.max_cells_per_turn
    }

    /// Whether selection is blocked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::from_words((0..100).map(|i| format!("w{i}"))).unwrap()
    }

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn test_starts_locked() {
        let mut turn = TurnController::new(2);
        assert_eq!(turn.select(&board(), pos(0, 0)), Err(SelectionError::Locked));
    }

    #[test]
    fn test_select_locks() {
        let board = board();
        let mut turn = TurnController::new(2);
        turn.begin_turn();
        assert_eq!(turn.select(&board, pos(0, 0)), Ok(Player::Player1));
        assert!(turn.is_locked());
        assert_eq!(turn.select(&board, pos(0, 1)), Err(SelectionError::Locked));
    }

    #[test]
    fn test_owned_cell_rejected_without_locking() {
        let mut board = board();
        board.claim(pos(3, 3), Player::Player2).unwrap();
        let mut turn = TurnController::new(2);
        turn.begin_turn();
        assert_eq!(
            turn.select(&board, pos(3, 3)),
            Err(SelectionError::AlreadyOwned(pos(3, 3)))
        );
        assert!(!turn.is_locked());
    }

    #[test]
    fn test_success_passes_turn_and_resets_counter() {
        let mut board = board();
        let mut turn = TurnController::new(2);
        turn.begin_turn();
        turn.select(&board, pos(5, 5)).unwrap();
        assert_eq!(
            turn.on_exhausted(),
            TurnDecision::Continues {
                player: Player::Player1,
                failed_cells: 1
            }
        );
        turn.select(&board, pos(0, 0)).unwrap();
        assert_eq!(
            turn.on_success(&mut board, pos(0, 0)).unwrap(),
            TurnDecision::Passed {
                from: Player::Player1,
                to: Player::Player2
            }
        );
        assert_eq!(turn.failed_cells(), 0);
        assert_eq!(board.owner(pos(0, 0)), Some(Player::Player1));
        assert!(!turn.is_locked());
    }

    #[test]
    fn test_second_exhaustion_passes_turn() {
        let mut turn = TurnController::new(2);
        turn.begin_turn();
        turn.on_exhausted();
        assert_eq!(
            turn.on_exhausted(),
            TurnDecision::Passed {
                from: Player::Player1,
                to: Player::Player2
            }
        );
        assert_eq!(turn.failed_cells(), 0);
        assert_eq!(turn.current(), Player::Player2);
    }

    #[test]
    fn test_winning_claim_keeps_player() {
        let mut board = board();
        for col in 0..4 {
            board.claim(pos(2, col), Player::Player1).unwrap();
        }
        let mut turn = TurnController::new(2);
        turn.begin_turn();
        turn.select(&board, pos(2, 4)).unwrap();
        let decision = turn.on_success(&mut board, pos(2, 4)).unwrap();
        assert!(matches!(
            decision,
            TurnDecision::Won {
                player: Player::Player1,
                ..
            }
        ));
        assert_eq!(turn.current(), Player::Player1);
        assert!(turn.is_locked());
    }
}
