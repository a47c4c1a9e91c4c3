//! The ordered word pool a board is built from.

use super::{Board, BoardError, BOARD_CELLS};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// An ordered list of candidate board words.
///
/// Only the first 100 entries reach the board; shuffling reorders the
/// whole pool so extras can rotate in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPool {
    words: Vec<String>,
}

impl WordPool {
    /// Creates a pool, dropping blank entries and trimming whitespace.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_string())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Words in order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words in the pool.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the pool holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether the pool can fill a board.
    pub fn is_playable(&self) -> bool {
        self.words.len() >= BOARD_CELLS
    }

    /// Shuffles the pool in place.
    #[instrument(skip(self, rng), fields(len = self.words.len()))]
    pub fn shuffle<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.words.shuffle(rng);
        info!("Word pool shuffled");
    }

    /// Builds a fresh, unowned board from the first 100 words.
    pub fn build_board(&self) -> Result<Board, BoardError> {
        Board::from_words(self.words.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_blank_entries_dropped() {
        let pool = WordPool::new(["  苹果 ", "", "   ", "香蕉"]);
        assert_eq!(pool.words(), ["苹果", "香蕉"]);
        assert!(!pool.is_playable());
    }

    #[test]
    fn test_shuffle_keeps_words() {
        let mut pool = WordPool::new((0..120).map(|i| format!("w{i}")));
        let mut before = pool.words().to_vec();
        pool.shuffle(&mut StdRng::seed_from_u64(7));
        let mut after = pool.words().to_vec();
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert!(pool.build_board().is_ok());
    }
}
