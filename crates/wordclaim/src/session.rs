//! The game session aggregate.
//!
//! [`GameSession`] owns the board, the turn controller, the pre-game
//! countdown and at most one attempt controller. It never blocks and
//! never spawns anything: every method applies one input and returns the
//! [`Effect`]s the caller must carry out.

use crate::attempt::{AttemptController, AttemptPhase, AttemptStep, AttemptToken};
use crate::config::EngineConfig;
use crate::effect::{Effect, TimerSlot};
use crate::error::{SelectionError, SessionError};
use crate::events::GameEvent;
#[cfg(debug_assertions)]
use crate::invariants::{InvariantSet, SessionInvariants};
use crate::timer::{Countdown, Generation, Tick};
use crate::turn::{TurnController, TurnDecision};
use crate::verification::{Outcome, VerificationUnsupported};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use wordclaim_rules::{Board, Player, Position, WordPool};

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Status {
    /// Waiting for start.
    #[display("not started")]
    NotStarted,
    /// Pre-game countdown running.
    #[display("starting ({remaining})")]
    Starting {
        /// Units left before play.
        remaining: u32,
    },
    /// Play in progress.
    #[display("in progress")]
    InProgress,
    /// A player completed a line.
    #[display("won by {_0}")]
    Won(Player),
}

/// Read-only view of the active attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptView {
    /// Selected cell.
    pub position: Position,
    /// Word to say.
    pub word: String,
    /// One-based number of the current try.
    pub attempt_number: u8,
    /// Tries allowed on this cell.
    pub max_attempts: u8,
    /// Units left in the current try.
    pub remaining: u32,
    /// Current phase.
    pub phase: AttemptPhase,
}

/// Everything a presentation layer needs to draw the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session status.
    pub status: Status,
    /// Player to act.
    pub current_player: Player,
    /// Exhausted cells so far this turn.
    pub failed_cells_this_turn: u8,
    /// Whether cell selection is blocked.
    pub selection_locked: bool,
    /// The board, when the pool could fill one.
    pub board: Option<Board>,
    /// The active attempt, if any.
    pub attempt: Option<AttemptView>,
}

/// One game between two players on one board.
#[derive(Debug, Clone)]
pub struct GameSession {
    pool: WordPool,
    board: Option<Board>,
    status: Status,
    turn: TurnController,
    attempt: Option<AttemptController>,
    pregame: Countdown,
    next_token: AttemptToken,
    config: EngineConfig,
}

impl GameSession {
    /// Creates a not-started session and builds the board from `pool`.
    ///
    /// A pool with fewer than 100 words leaves the session without a
    /// board; [`GameSession::start`] then fails.
    #[instrument(skip_all, fields(pool_len = pool.len()))]
    pub fn new(pool: WordPool, config: &EngineConfig) -> Self {
        let board = match pool.build_board() {
            Ok(board) => Some(board),
            Err(e) => {
                warn!(error = %e, "Session created without a board");
                None
            }
        };
        Self {
            pool,
            board,
            status: Status::NotStarted,
            turn: TurnController::new(*config.max_cells_per_turn()),
            attempt: None,
            pregame: Countdown::new(),
            next_token: AttemptToken::first(),
            config: config.clone(),
        }
    }

    /// Starts the pre-game countdown.
    ///
    /// # Errors
    ///
    /// [`SessionError::AlreadyStarted`] unless not started, and
    /// [`SessionError::InsufficientWordPool`] when there is no board.
    #[instrument(skip(self), fields(status = %self.status))]
    pub fn start(&mut self) -> Result<Vec<Effect>, SessionError> {
        if self.status != Status::NotStarted {
            debug!("Start rejected");
            return Err(SessionError::AlreadyStarted);
        }
        if self.board.is_none() {
            warn!(pool_len = self.pool.len(), "Cannot start without a board");
            return Err(SessionError::InsufficientWordPool(self.pool.len()));
        }

        let units = *self.config.pregame_countdown();
        if units == 0 {
            let effects = self.begin_play();
            self.assert_invariants();
            return Ok(effects);
        }

        let generation = self.pregame.start(units);
        self.status = Status::Starting { remaining: units };
        info!(units, "Pre-game countdown started");
        self.assert_invariants();
        Ok(vec![
            Effect::Emit(GameEvent::CountdownStarted { units }),
            Effect::StartTicker {
                slot: TimerSlot::Pregame,
                generation,
            },
        ])
    }

    /// Selects a cell for the current player and opens an attempt on it.
    ///
    /// # Errors
    ///
    /// Rejected selections leave the session unchanged.
    #[instrument(skip(self), fields(status = %self.status, player = %self.turn.current()))]
    pub fn select(&mut self, pos: Position) -> Result<Vec<Effect>, SelectionError> {
        if self.status != Status::InProgress {
            debug!("Selection rejected: not in progress");
            return Err(SelectionError::NotInProgress);
        }
        let Some(board) = self.board.as_ref() else {
            return Err(SelectionError::NotInProgress);
        };

        let player = self.turn.select(board, pos)?;
        let word = board.cell(pos).word().to_string();
        let token = self.next_token;
        self.next_token = token.next();

        let max_attempts = *self.config.max_attempts_per_cell();
        let timeout = *self.config.attempt_timeout();
        let (attempt, generation) =
            AttemptController::open(token, pos, word.clone(), max_attempts, timeout);
        self.attempt = Some(attempt);
        info!(%token, %word, "Cell selected");
        self.assert_invariants();

        Ok(vec![
            Effect::Emit(GameEvent::AttemptOpened {
                player,
                position: pos,
                word,
                max_attempts,
                timeout,
            }),
            Effect::StartTicker {
                slot: TimerSlot::Attempt(token),
                generation,
            },
        ])
    }

    /// Selects a cell by row-major index.
    pub fn select_index(&mut self, index: usize) -> Result<Vec<Effect>, SelectionError> {
        let pos = Position::from_index(index).ok_or(SelectionError::OutOfRange(index))?;
        self.select(pos)
    }

    /// The player has spoken; verify the active attempt's word.
    ///
    /// Ignored unless an attempt is awaiting input.
    #[instrument(skip(self))]
    pub fn submit(&mut self) -> Vec<Effect> {
        let Some(attempt) = self.attempt.as_mut() else {
            debug!("Submit ignored: no active attempt");
            return Vec::new();
        };
        if !attempt.submit() {
            return Vec::new();
        }

        let token = attempt.token();
        let position = attempt.position();
        let word = attempt.word().to_string();
        self.assert_invariants();
        vec![
            Effect::Emit(GameEvent::Verifying { position }),
            Effect::StopTicker {
                slot: TimerSlot::Attempt(token),
            },
            Effect::Verify { token, word },
        ]
    }

    /// Applies one countdown tick.
    pub fn on_tick(&mut self, slot: TimerSlot, generation: Generation) -> Vec<Effect> {
        let effects = match slot {
            TimerSlot::Pregame => self.on_pregame_tick(generation),
            TimerSlot::Attempt(token) => self.on_attempt_tick(token, generation),
        };
        self.assert_invariants();
        effects
    }

    fn on_pregame_tick(&mut self, generation: Generation) -> Vec<Effect> {
        if !matches!(self.status, Status::Starting { .. }) {
            return Vec::new();
        }
        match self.pregame.tick(generation) {
            Tick::Ignored => Vec::new(),
            Tick::Counting(remaining) => {
                self.status = Status::Starting { remaining };
                vec![Effect::Emit(GameEvent::CountdownTick { remaining })]
            }
            Tick::Expired => {
                let mut effects = vec![
                    Effect::StopTicker {
                        slot: TimerSlot::Pregame,
                    },
                    Effect::Emit(GameEvent::CountdownFinished),
                ];
                effects.extend(self.begin_play());
                effects
            }
        }
    }

    fn on_attempt_tick(&mut self, token: AttemptToken, generation: Generation) -> Vec<Effect> {
        let Some(attempt) = self.active_attempt(token) else {
            debug!(%token, "Stale attempt tick ignored");
            return Vec::new();
        };
        let step = attempt.on_tick(generation);
        self.apply_step(token, step)
    }

    /// Applies a gateway result for the attempt identified by `token`.
    ///
    /// Results for any attempt other than the active one are discarded.
    #[instrument(skip(self))]
    pub fn on_verification(
        &mut self,
        token: AttemptToken,
        result: Result<Outcome, VerificationUnsupported>,
    ) -> Vec<Effect> {
        let Some(attempt) = self.active_attempt(token) else {
            debug!("Stale verification result ignored");
            return Vec::new();
        };
        let step = attempt.on_verification(result);
        let effects = self.apply_step(token, step);
        self.assert_invariants();
        effects
    }

    /// Returns to not-started from any state.
    ///
    /// Aborts the attempt, stops every countdown and clears ownership
    /// before returning.
    #[instrument(skip(self), fields(status = %self.status))]
    pub fn reset(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();

        if let Some(mut attempt) = self.attempt.take() {
            let token = attempt.token();
            if attempt.phase() == AttemptPhase::Verifying {
                effects.push(Effect::CancelVerification { token });
            }
            attempt.abort();
            effects.push(Effect::StopTicker {
                slot: TimerSlot::Attempt(token),
            });
        }

        if matches!(self.status, Status::Starting { .. }) {
            effects.push(Effect::StopTicker {
                slot: TimerSlot::Pregame,
            });
        }
        self.pregame.stop();

        if let Some(board) = self.board.as_mut() {
            board.clear_owners();
        }
        self.turn.reset();
        self.status = Status::NotStarted;
        info!("Session reset");
        effects.push(Effect::Emit(GameEvent::Reset));
        self.assert_invariants();
        effects
    }

    /// Shuffles the pool with the thread RNG and builds a fresh board.
    pub fn randomize(&mut self) -> Result<Vec<Effect>, SessionError> {
        self.randomize_with(&mut rand::rng())
    }

    /// Shuffles the pool with `rng` and builds a fresh, unowned board.
    ///
    /// Allowed while not started or won; a won session stays won.
    ///
    /// # Errors
    ///
    /// [`SessionError::GameInProgress`] while starting or in progress, and
    /// [`SessionError::InsufficientWordPool`] when the pool cannot fill a
    /// board.
    #[instrument(skip(self, rng), fields(status = %self.status))]
    pub fn randomize_with<R: rand::Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Vec<Effect>, SessionError> {
        if matches!(self.status, Status::Starting { .. } | Status::InProgress) {
            debug!("Randomize rejected");
            return Err(SessionError::GameInProgress);
        }
        if !self.pool.is_playable() {
            warn!(pool_len = self.pool.len(), "Pool too small to randomize");
            return Err(SessionError::InsufficientWordPool(self.pool.len()));
        }

        self.pool.shuffle(rng);
        let board = self
            .pool
            .build_board()
            .map_err(|_| SessionError::InsufficientWordPool(self.pool.len()))?;
        self.board = Some(board);
        self.assert_invariants();
        Ok(vec![Effect::Emit(GameEvent::BoardRebuilt)])
    }

    /// Current view for presentation layers.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            current_player: self.turn.current(),
            failed_cells_this_turn: self.turn.failed_cells(),
            selection_locked: self.turn.is_locked(),
            board: self.board.clone(),
            attempt: self.attempt.as_ref().map(|a| AttemptView {
                position: a.position(),
                word: a.word().to_string(),
                attempt_number: a.attempt_number(),
                max_attempts: a.max_attempts(),
                remaining: a.remaining(),
                phase: a.phase(),
            }),
        }
    }

    fn begin_play(&mut self) -> Vec<Effect> {
        self.status = Status::InProgress;
        self.turn.reset();
        let player = self.turn.begin_turn();
        info!(%player, "Game in progress");
        vec![Effect::Emit(GameEvent::AwaitingSelection { player })]
    }

    fn active_attempt(&mut self, token: AttemptToken) -> Option<&mut AttemptController> {
        self.attempt
            .as_mut()
            .filter(|a| a.token() == token && a.is_active())
    }

    fn apply_step(&mut self, token: AttemptToken, step: AttemptStep) -> Vec<Effect> {
        let slot = TimerSlot::Attempt(token);
        let max_attempts = *self.config.max_attempts_per_cell();
        match step {
            AttemptStep::Ignored => Vec::new(),
            AttemptStep::Ticked { remaining } => {
                vec![Effect::Emit(GameEvent::AttemptTick { remaining })]
            }
            AttemptStep::Retrying {
                reason,
                attempts_used,
                generation,
            } => vec![
                Effect::Emit(GameEvent::AttemptFailed {
                    reason,
                    attempts_used,
                    max_attempts,
                    retrying: true,
                }),
                Effect::StartTicker { slot, generation },
            ],
            AttemptStep::Unsupported { remaining } => {
                warn!(%token, remaining, "Verification unsupported; attempt not counted");
                let generation = self
                    .attempt
                    .as_ref()
                    .map(|a| a.generation())
                    .unwrap_or_default();
                vec![
                    Effect::Emit(GameEvent::SpeechUnsupported),
                    Effect::StartTicker { slot, generation },
                ]
            }
            AttemptStep::Succeeded => {
                let mut effects = vec![Effect::StopTicker { slot }];
                effects.extend(self.finish_success());
                effects
            }
            AttemptStep::Exhausted { reason } => {
                let mut effects = vec![
                    Effect::StopTicker { slot },
                    Effect::Emit(GameEvent::AttemptFailed {
                        reason,
                        attempts_used: max_attempts,
                        max_attempts,
                        retrying: false,
                    }),
                ];
                effects.extend(self.finish_exhausted());
                effects
            }
        }
    }

    fn finish_success(&mut self) -> Vec<Effect> {
        let Some(attempt) = self.attempt.take() else {
            return Vec::new();
        };
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };

        let player = self.turn.current();
        let position = attempt.position();
        let decision = match self.turn.on_success(board, position) {
            Ok(decision) => decision,
            Err(e) => {
                error!(error = %e, "Claim failed after verification");
                self.turn.begin_turn();
                return vec![Effect::Emit(GameEvent::AwaitingSelection { player })];
            }
        };

        let mut effects = vec![Effect::Emit(GameEvent::CellClaimed {
            player,
            position,
            word: attempt.word().to_string(),
        })];
        effects.extend(self.follow_decision(decision));
        effects
    }

    fn finish_exhausted(&mut self) -> Vec<Effect> {
        let Some(attempt) = self.attempt.take() else {
            return Vec::new();
        };
        let player = self.turn.current();
        let failed_cells = self.turn.failed_cells() + 1;
        let decision = self.turn.on_exhausted();

        let mut effects = vec![Effect::Emit(GameEvent::CellExhausted {
            player,
            position: attempt.position(),
            failed_cells,
            max_cells: self.turn.max_cells_per_turn(),
        })];
        effects.extend(self.follow_decision(decision));
        effects
    }

    fn follow_decision(&mut self, decision: TurnDecision) -> Vec<Effect> {
        match decision {
            TurnDecision::Won { player, line } => {
                self.status = Status::Won(player);
                info!(%player, "Game won");
                vec![Effect::Emit(GameEvent::GameWon { player, line })]
            }
            TurnDecision::Continues { player, .. } => {
                vec![Effect::Emit(GameEvent::AwaitingSelection { player })]
            }
            TurnDecision::Passed { from, to } => vec![
                Effect::Emit(GameEvent::TurnPassed { from, to }),
                Effect::Emit(GameEvent::AwaitingSelection { player: to }),
            ],
        }
    }

    fn assert_invariants(&self) {
        #[cfg(debug_assertions)]
        if let Err(violations) = SessionInvariants::check_all(self) {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            error!(%descriptions, "Session invariant violated");
            panic!("Session invariant violated: {}", descriptions);
        }
    }

    /// Session status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The board, if the pool could fill one.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// The word pool.
    pub fn pool(&self) -> &WordPool {
        &self.pool
    }

    /// Turn state.
    pub fn turn(&self) -> &TurnController {
        &self.turn
    }

    /// The active attempt, if any.
    pub fn attempt(&self) -> Option<&AttemptController> {
        self.attempt.as_ref()
    }

    /// Player to act.
    pub fn current_player(&self) -> Player {
        self.turn.current()
    }

    /// Exhausted cells so far this turn.
    pub fn failed_cells_this_turn(&self) -> u8 {
        self.turn.failed_cells()
    }

    /// Configuration the session was created with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
