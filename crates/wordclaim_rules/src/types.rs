//! Core domain types for the word board.

use super::{BoardError, Position, BOARD_CELLS, BOARD_SIDE};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One of the two players.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter, derive_more::Display,
)]
pub enum Player {
    /// Player 1 (goes first).
    #[display("Player 1")]
    Player1,
    /// Player 2.
    #[display("Player 2")]
    Player2,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Player1 => Player::Player2,
            Player::Player2 => Player::Player1,
        }
    }

    /// Player number as shown to people (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Player::Player1 => 1,
            Player::Player2 => 2,
        }
    }

    /// Single-character mark for text rendering.
    pub fn symbol(self) -> char {
        match self {
            Player::Player1 => 'O',
            Player::Player2 => '#',
        }
    }
}

/// A board cell: the word printed on it and who has claimed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    word: String,
    owner: Option<Player>,
}

impl Cell {
    /// The word printed on this cell.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// The claiming player, if any.
    pub fn owner(&self) -> Option<Player> {
        self.owner
    }

    /// Whether nobody has claimed this cell yet.
    pub fn is_unowned(&self) -> bool {
        self.owner.is_none()
    }
}

/// The 10×10 word board.
///
/// Always holds exactly [`BOARD_CELLS`] cells in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct RawBoard {
    cells: Vec<Cell>,
}

impl TryFrom<RawBoard> for Board {
    type Error = BoardError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        if raw.cells.len() != BOARD_CELLS {
            return Err(BoardError::WrongCellCount(raw.cells.len()));
        }
        Ok(Self { cells: raw.cells })
    }
}

impl Board {
    /// Builds an unowned board from the first 100 words of a pool.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InsufficientWordPool`] when fewer than 100
    /// words are supplied.
    #[instrument(skip(words))]
    pub fn from_words<I, S>(words: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells: Vec<Cell> = words
            .into_iter()
            .take(BOARD_CELLS)
            .map(|word| Cell {
                word: word.into(),
                owner: None,
            })
            .collect();

        if cells.len() < BOARD_CELLS {
            debug!(supplied = cells.len(), "Word pool too small for a board");
            return Err(BoardError::InsufficientWordPool(cells.len()));
        }

        Ok(Self { cells })
    }

    /// Gets the cell at a position.
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[pos.index()]
    }

    /// Owner of the cell at a position.
    pub fn owner(&self, pos: Position) -> Option<Player> {
        self.cell(pos).owner
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells a player owns.
    pub fn owned_by(&self, player: Player) -> usize {
        self.cells.iter().filter(|c| c.owner == Some(player)).count()
    }

    /// Sets the owner of an unowned cell.
    ///
    /// Ownership is set once; claiming an owned cell is an error and
    /// leaves the board untouched.
    #[instrument(skip(self), fields(position = %pos, player = %player))]
    pub fn claim(&mut self, pos: Position, player: Player) -> Result<(), BoardError> {
        let cell = &mut self.cells[pos.index()];
        if let Some(existing) = cell.owner {
            return Err(BoardError::AlreadyOwned(pos, existing));
        }
        cell.owner = Some(player);
        Ok(())
    }

    /// Clears every owner, keeping the words.
    #[instrument(skip(self))]
    pub fn clear_owners(&mut self) {
        for cell in &mut self.cells {
            cell.owner = None;
        }
    }

    /// Formats the board as a human-readable grid.
    ///
    /// Unowned cells show their word, owned cells show the owner's mark.
    pub fn display(&self) -> String {
        let width = self
            .cells
            .iter()
            .map(|c| c.word.chars().count())
            .max()
            .unwrap_or(1)
            .max(2);

        let mut result = String::new();
        for row in 0..BOARD_SIDE {
            result.push_str(&format!("{row} "));
            for col in 0..BOARD_SIDE {
                let cell = &self.cells[row * BOARD_SIDE + col];
                let text = match cell.owner {
                    Some(player) => player.symbol().to_string().repeat(2),
                    None => cell.word.clone(),
                };
                let pad = width.saturating_sub(text.chars().count());
                result.push('|');
                result.push_str(&text);
                result.push_str(&" ".repeat(pad));
            }
            result.push_str("|\n");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("w{i}")).collect()
    }

    #[test]
    fn test_from_words_truncates_extras() {
        let board = Board::from_words(words(130)).unwrap();
        assert_eq!(board.cells().len(), BOARD_CELLS);
        assert_eq!(board.cells()[99].word(), "w99");
    }

    #[test]
    fn test_from_words_rejects_short_pool() {
        assert_eq!(
            Board::from_words(words(99)),
            Err(BoardError::InsufficientWordPool(99))
        );
    }

    #[test]
    fn test_claim_is_set_once() {
        let mut board = Board::from_words(words(100)).unwrap();
        let pos = Position::new(3, 4).unwrap();
        board.claim(pos, Player::Player1).unwrap();
        assert_eq!(
            board.claim(pos, Player::Player2),
            Err(BoardError::AlreadyOwned(pos, Player::Player1))
        );
        assert_eq!(board.owner(pos), Some(Player::Player1));
    }

    #[test]
    fn test_clear_owners_keeps_words() {
        let mut board = Board::from_words(words(100)).unwrap();
        let pos = Position::new(0, 0).unwrap();
        board.claim(pos, Player::Player2).unwrap();
        board.clear_owners();
        assert!(board.cells().iter().all(Cell::is_unowned));
        assert_eq!(board.cell(pos).word(), "w0");
    }

    #[test]
    fn test_deserialize_requires_full_board() {
        let mut board = Board::from_words(words(100)).unwrap();
        board
            .claim(Position::new(1, 1).unwrap(), Player::Player2)
            .unwrap();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(serde_json::from_str::<Board>(&json).unwrap(), board);

        let short = r#"{"cells":[{"word":"w0","owner":null}]}"#;
        let err = serde_json::from_str::<Board>(short).unwrap_err();
        assert!(err.to_string().contains("Board has 1 cells"));
    }

    #[test]
    fn test_player_display_and_opponent() {
        assert_eq!(Player::Player1.to_string(), "Player 1");
        assert_eq!(Player::Player2.opponent(), Player::Player1);
    }
}
