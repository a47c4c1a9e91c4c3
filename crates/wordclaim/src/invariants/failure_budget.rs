//! Failure budget invariant: the per-turn counter never reaches its limit.

use super::Invariant;
use crate::session::GameSession;

/// Invariant: exhausted cells this turn stay below the per-turn limit.
///
/// Reaching the limit passes the turn and zeroes the counter in the same
/// transition, so the limit itself is never observable.
pub struct FailureBudgetInvariant;

impl Invariant<GameSession> for FailureBudgetInvariant {
    fn holds(session: &GameSession) -> bool {
        session.turn().failed_cells() < session.turn().max_cells_per_turn()
    }

    fn description() -> &'static str {
        "Exhausted cells this turn stay below the per-turn limit"
    }
}
