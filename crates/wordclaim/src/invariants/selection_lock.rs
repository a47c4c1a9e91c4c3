//! Selection lock invariant: at most one attempt, and only on a locked board.

use super::Invariant;
use crate::session::{GameSession, Status};

/// Invariant: an active attempt implies a locked board, and an unlocked
/// board implies a game in progress with no attempt.
pub struct SelectionLockInvariant;

impl Invariant<GameSession> for SelectionLockInvariant {
    fn holds(session: &GameSession) -> bool {
        let locked = session.turn().is_locked();
        if session.attempt().is_some() && !locked {
            return false;
        }
        if !locked {
            return session.status() == Status::InProgress && session.attempt().is_none();
        }
        true
    }

    fn description() -> &'static str {
        "Selection is locked while an attempt is active or no game is in progress"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use wordclaim_rules::WordPool;

    #[test]
    fn test_not_started_is_locked() {
        let pool = WordPool::new((0..100).map(|i| format!("w{i}")));
        let session = GameSession::new(pool, &EngineConfig::default());
        assert!(session.turn().is_locked());
        assert!(SelectionLockInvariant::holds(&session));
    }
}
