//! Clean board invariant: nobody owns anything before play begins.

use super::Invariant;
use crate::session::{GameSession, Status};

/// Invariant: while not started or starting, every cell is unowned.
pub struct CleanBoardBeforePlayInvariant;

impl Invariant<GameSession> for CleanBoardBeforePlayInvariant {
    fn holds(session: &GameSession) -> bool {
        match session.status() {
            Status::NotStarted | Status::Starting { .. } => session
                .board()
                .is_none_or(|board| board.cells().iter().all(|c| c.is_unowned())),
            Status::InProgress | Status::Won(_) => true,
        }
    }

    fn description() -> &'static str {
        "Every cell is unowned before play begins"
    }
}
