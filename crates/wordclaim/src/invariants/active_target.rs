//! Active target invariant: the cell under attempt is still up for grabs.

use super::Invariant;
use crate::session::{GameSession, Status};

/// Invariant: an active attempt targets an unowned cell of a game in
/// progress.
pub struct ActiveTargetUnownedInvariant;

impl Invariant<GameSession> for ActiveTargetUnownedInvariant {
    fn holds(session: &GameSession) -> bool {
        let Some(attempt) = session.attempt() else {
            return true;
        };
        if session.status() != Status::InProgress {
            return false;
        }
        session
            .board()
            .is_some_and(|board| board.owner(attempt.position()).is_none())
    }

    fn description() -> &'static str {
        "An active attempt targets an unowned cell of a game in progress"
    }
}
