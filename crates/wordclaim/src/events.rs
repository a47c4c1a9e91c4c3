//! Symbolic events for presentation layers.
//!
//! The engine never plays sounds or draws anything. It emits
//! [`GameEvent`]s; a presentation layer renders the instruction text and
//! plays whatever [`Cue`]s it supports.

use crate::attempt::FailureReason;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use wordclaim_rules::{Player, Position, WinLine};

/// Something observable happened in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum GameEvent {
    /// Pre-game countdown began.
    #[display("Get ready for match")]
    CountdownStarted {
        /// Units to count down.
        units: u32,
    },

    /// Pre-game countdown advanced.
    #[display("{remaining}")]
    CountdownTick {
        /// Units left.
        remaining: u32,
    },

    /// Pre-game countdown ran out.
    #[display("Go!")]
    CountdownFinished,

    /// A player may select a cell.
    #[display("{player}'s turn")]
    AwaitingSelection {
        /// Whose turn it is.
        player: Player,
    },

    /// A cell was selected and its first attempt opened.
    #[display("{player} is guessing… {word} (attempt 1 / {max_attempts})")]
    AttemptOpened {
        /// Acting player.
        player: Player,
        /// Selected cell.
        position: Position,
        /// Word to say.
        word: String,
        /// Attempts allowed on this cell.
        max_attempts: u8,
        /// Units per attempt.
        timeout: u32,
    },

    /// The attempt countdown advanced.
    #[display("{remaining}")]
    AttemptTick {
        /// Units left.
        remaining: u32,
    },

    /// The player submitted an utterance; verification is running.
    #[display("Listening…")]
    Verifying {
        /// Cell being verified.
        position: Position,
    },

    /// One attempt failed.
    #[display("{reason} (attempt {attempts_used} / {max_attempts})")]
    AttemptFailed {
        /// Why it failed.
        reason: FailureReason,
        /// Attempts consumed on this cell so far.
        attempts_used: u8,
        /// Attempts allowed on this cell.
        max_attempts: u8,
        /// Whether another attempt follows.
        retrying: bool,
    },

    /// A cell was claimed.
    #[display("✔ Correct! {player} claims {word} at {position}")]
    CellClaimed {
        /// Claiming player.
        player: Player,
        /// Claimed cell.
        position: Position,
        /// Word on the cell.
        word: String,
    },

    /// All attempts on a cell failed; it stays unclaimed.
    #[display("{player} failed {position} ({failed_cells} / {max_cells} this turn)")]
    CellExhausted {
        /// Acting player.
        player: Player,
        /// The cell.
        position: Position,
        /// Exhausted cells this turn, counting this one.
        failed_cells: u8,
        /// Exhausted cells allowed per turn.
        max_cells: u8,
    },

    /// The turn passed to the other player.
    #[display("Turn passes from {from} to {to}")]
    TurnPassed {
        /// Previous player.
        from: Player,
        /// Next player.
        to: Player,
    },

    /// A player completed a line.
    #[display("{player} wins!")]
    GameWon {
        /// The winner.
        player: Player,
        /// The completed line.
        line: WinLine,
    },

    /// Verification is unavailable; the attempt was not counted.
    #[display("Speech recognition is not supported here. The attempt was not counted.")]
    SpeechUnsupported,

    /// The word pool was shuffled and a fresh board built.
    #[display("Board randomized.")]
    BoardRebuilt,

    /// The session returned to its initial state.
    #[display("Press Start Game")]
    Reset,
}

/// An audio/visual cue a presentation layer may play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// A cell was picked.
    Click,
    /// Start the looping countdown tick.
    TickingStart,
    /// Stop the looping countdown tick.
    TickingStop,
    /// Failed attempt.
    Error,
    /// Correct answer.
    Bingo,
    /// A mark drawn on a cell.
    Marking,
    /// Winner fanfare and confetti.
    Winner,
}

impl GameEvent {
    /// Cues associated with this event, in play order.
    pub fn cues(&self) -> &'static [Cue] {
        match self {
            GameEvent::CountdownStarted { .. } => &[Cue::TickingStart],
            GameEvent::CountdownFinished => &[Cue::TickingStop],
            GameEvent::AttemptOpened { .. } => &[Cue::Click, Cue::TickingStart],
            GameEvent::Verifying { .. } => &[Cue::TickingStop],
            GameEvent::AttemptFailed { retrying: true, .. } => &[Cue::Error, Cue::TickingStart],
            GameEvent::AttemptFailed { retrying: false, .. } => &[Cue::Error, Cue::TickingStop],
            GameEvent::CellClaimed { .. } => &[Cue::Bingo, Cue::Marking],
            GameEvent::GameWon { .. } => &[Cue::Winner],
            GameEvent::Reset => &[Cue::TickingStop],
            GameEvent::SpeechUnsupported => &[Cue::TickingStart],
            GameEvent::CountdownTick { .. }
            | GameEvent::AwaitingSelection { .. }
            | GameEvent::AttemptTick { .. }
            | GameEvent::CellExhausted { .. }
            | GameEvent::TurnPassed { .. }
            | GameEvent::BoardRebuilt => &[],
        }
    }

    /// Whether this event ends the game.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::GameWon { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_text() {
        let event = GameEvent::AwaitingSelection {
            player: Player::Player2,
        };
        assert_eq!(event.to_string(), "Player 2's turn");

        let failed = GameEvent::AttemptFailed {
            reason: FailureReason::Timeout,
            attempts_used: 1,
            max_attempts: 3,
            retrying: true,
        };
        assert_eq!(failed.to_string(), "Time out. Try again. (attempt 1 / 3)");
    }

    #[test]
    fn test_claim_cues() {
        let event = GameEvent::CellClaimed {
            player: Player::Player1,
            position: Position::new(0, 0).unwrap(),
            word: "苹果".to_string(),
        };
        assert_eq!(event.cues(), &[Cue::Bingo, Cue::Marking]);
        assert!(!event.is_terminal());
    }
}
