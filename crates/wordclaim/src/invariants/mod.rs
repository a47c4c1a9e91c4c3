//! First-class invariants for the game session.
//!
//! Each invariant is a logical property of a
//! [`GameSession`](crate::session::GameSession) that must hold
//! after every transition. They compose into an [`InvariantSet`] and are
//! checked in debug builds.

mod active_target;
mod clean_board;
mod failure_budget;
mod selection_lock;

pub use active_target::ActiveTargetUnownedInvariant;
pub use clean_board::CleanBoardBeforePlayInvariant;
pub use failure_budget::FailureBudgetInvariant;
pub use selection_lock::SelectionLockInvariant;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of up to four invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns every violation, not just the first.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);

/// Every session invariant as a composable set.
pub type SessionInvariants = (
    FailureBudgetInvariant,
    SelectionLockInvariant,
    CleanBoardBeforePlayInvariant,
    ActiveTargetUnownedInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::effect::{Effect, TimerSlot};
    use crate::session::GameSession;
    use wordclaim_rules::WordPool;

    fn session() -> GameSession {
        let pool = WordPool::new((0..100).map(|i| format!("w{i}")));
        GameSession::new(pool, &EngineConfig::default())
    }

    #[test]
    fn test_invariant_set_holds_for_new_session() {
        assert!(SessionInvariants::check_all(&session()).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_through_selection() {
        let mut session = session();
        let effects = session.start().unwrap();
        let generation = effects
            .iter()
            .find_map(|e| match e {
                Effect::StartTicker { generation, .. } => Some(*generation),
                _ => None,
            })
            .unwrap();
        for _ in 0..3 {
            session.on_tick(TimerSlot::Pregame, generation);
        }
        session.select_index(42).unwrap();
        assert!(session.attempt().is_some());
        assert!(SessionInvariants::check_all(&session).is_ok());
    }

    #[test]
    fn test_two_invariants_as_set() {
        type TwoInvariants = (FailureBudgetInvariant, SelectionLockInvariant);
        assert!(TwoInvariants::check_all(&session()).is_ok());
    }
}
