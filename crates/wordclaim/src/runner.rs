//! Async driver for a [`GameSession`].
//!
//! The runner task owns the session and handles one [`Command`] at a
//! time: user actions from [`SessionHandle`]s, ticks from its ticker
//! tasks and results from its verification tasks. Effects returned by the
//! session are carried out before the next command is taken, so timer
//! expiry and verification results can race but never interleave.
//!
//! Ticker and verification tasks hold only weak senders. Dropping every
//! handle (or calling [`SessionHandle::shutdown`]) stops the runner, which
//! aborts whatever it spawned.

use crate::attempt::AttemptToken;
use crate::effect::{Effect, TimerSlot};
use crate::error::{SelectionError, SessionError};
use crate::events::GameEvent;
use crate::session::{GameSession, SessionSnapshot};
use crate::timer::Generation;
use crate::verification::{Outcome, VerificationGateway, VerificationUnsupported};
use derive_more::Display;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, instrument, trace};
use wordclaim_rules::Position;

/// Messages processed by the runner task.
#[derive(Debug)]
enum Command {
    Start(oneshot::Sender<Result<(), SessionError>>),
    Select(Position, oneshot::Sender<Result<(), SelectionError>>),
    Submit(oneshot::Sender<()>),
    Reset(oneshot::Sender<()>),
    Randomize(oneshot::Sender<Result<(), SessionError>>),
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Tick {
        slot: TimerSlot,
        generation: Generation,
    },
    Verified {
        token: AttemptToken,
        result: Result<Outcome, VerificationUnsupported>,
    },
    Shutdown,
}

/// Error returned by [`SessionHandle`] methods.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum HandleError {
    /// The runner has stopped.
    #[display("Session runner has stopped")]
    Closed,
    /// The session refused the action.
    #[display("{_0}")]
    Session(SessionError),
    /// The selection was rejected.
    #[display("{_0}")]
    Selection(SelectionError),
}

impl std::error::Error for HandleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandleError::Closed => None,
            HandleError::Session(e) => Some(e),
            HandleError::Selection(e) => Some(e),
        }
    }
}

impl From<SessionError> for HandleError {
    fn from(err: SessionError) -> Self {
        HandleError::Session(err)
    }
}

impl From<SelectionError> for HandleError {
    fn from(err: SelectionError) -> Self {
        HandleError::Selection(err)
    }
}

/// Cloneable handle for driving a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl SessionHandle {
    /// Starts the game.
    pub async fn start(&self) -> Result<(), HandleError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Start(tx))?;
        Ok(rx.await.map_err(|_| HandleError::Closed)??)
    }

    /// Selects a cell for the current player.
    pub async fn select(&self, pos: Position) -> Result<(), HandleError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Select(pos, tx))?;
        Ok(rx.await.map_err(|_| HandleError::Closed)??)
    }

    /// Selects a cell by row-major index.
    pub async fn select_index(&self, index: usize) -> Result<(), HandleError> {
        let pos = Position::from_index(index).ok_or(SelectionError::OutOfRange(index))?;
        self.select(pos).await
    }

    /// Submits the current utterance for verification.
    pub async fn submit(&self) -> Result<(), HandleError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Submit(tx))?;
        rx.await.map_err(|_| HandleError::Closed)
    }

    /// Resets the session.
    pub async fn reset(&self) -> Result<(), HandleError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Reset(tx))?;
        rx.await.map_err(|_| HandleError::Closed)
    }

    /// Shuffles the pool and rebuilds the board.
    pub async fn randomize(&self) -> Result<(), HandleError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Randomize(tx))?;
        Ok(rx.await.map_err(|_| HandleError::Closed)??)
    }

    /// Current session view.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, HandleError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await.map_err(|_| HandleError::Closed)
    }

    /// Stops the runner. Pending commands after this are dropped.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }

    fn send(&self, command: Command) -> Result<(), HandleError> {
        self.commands.send(command).map_err(|_| HandleError::Closed)
    }
}

/// Spawns the runner task for `session`.
///
/// Returns a handle for issuing actions, the event stream for
/// presentation layers, and the runner's join handle. Must be called
/// inside a tokio runtime.
#[instrument(skip_all, fields(tick_millis = session.config().tick_millis()))]
pub fn spawn(
    session: GameSession,
    gateway: VerificationGateway,
) -> (
    SessionHandle,
    mpsc::UnboundedReceiver<GameEvent>,
    JoinHandle<()>,
) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let runner = Runner {
        tick: session.config().tick(),
        session,
        gateway,
        commands: command_rx,
        internal: command_tx.downgrade(),
        events: event_tx,
        pregame_ticker: None,
        attempt_ticker: None,
        verification: None,
    };
    let join = tokio::spawn(runner.run());
    info!("Session runner spawned");

    (
        SessionHandle {
            commands: command_tx,
        },
        event_rx,
        join,
    )
}

struct Runner {
    session: GameSession,
    gateway: VerificationGateway,
    tick: Duration,
    commands: mpsc::UnboundedReceiver<Command>,
    internal: mpsc::WeakUnboundedSender<Command>,
    events: mpsc::UnboundedSender<GameEvent>,
    pregame_ticker: Option<JoinHandle<()>>,
    attempt_ticker: Option<(AttemptToken, JoinHandle<()>)>,
    verification: Option<(AttemptToken, JoinHandle<()>)>,
}

impl Runner {
    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            if !self.handle(command) {
                break;
            }
        }
        self.stop_tasks();
        info!("Session runner stopped");
    }

    /// Returns false when the runner should stop.
    fn handle(&mut self, command: Command) -> bool {
        trace!(?command, "Command received");
        match command {
            Command::Start(reply) => {
                let result = self.session.start().map(|effects| self.execute(effects));
                let _ = reply.send(result);
            }
            Command::Select(pos, reply) => {
                let result = self.session.select(pos).map(|effects| self.execute(effects));
                let _ = reply.send(result);
            }
            Command::Submit(reply) => {
                let effects = self.session.submit();
                self.execute(effects);
                let _ = reply.send(());
            }
            Command::Reset(reply) => {
                let effects = self.session.reset();
                self.execute(effects);
                let _ = reply.send(());
            }
            Command::Randomize(reply) => {
                let result = self.session.randomize().map(|effects| self.execute(effects));
                let _ = reply.send(result);
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.session.snapshot());
            }
            Command::Tick { slot, generation } => {
                let effects = self.session.on_tick(slot, generation);
                self.execute(effects);
            }
            Command::Verified { token, result } => {
                if self
                    .verification
                    .as_ref()
                    .is_some_and(|(current, _)| *current == token)
                {
                    self.verification = None;
                }
                let effects = self.session.on_verification(token, result);
                self.execute(effects);
            }
            Command::Shutdown => return false,
        }
        true
    }

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartTicker { slot, generation } => {
                    let handle = self.spawn_ticker(slot, generation);
                    match slot {
                        TimerSlot::Pregame => {
                            if let Some(old) = self.pregame_ticker.replace(handle) {
                                old.abort();
                            }
                        }
                        TimerSlot::Attempt(token) => {
                            if let Some((_, old)) = self.attempt_ticker.replace((token, handle)) {
                                old.abort();
                            }
                        }
                    }
                }
                Effect::StopTicker { slot } => match slot {
                    TimerSlot::Pregame => {
                        if let Some(old) = self.pregame_ticker.take() {
                            old.abort();
                        }
                    }
                    TimerSlot::Attempt(token) => {
                        if let Some((_, old)) = self
                            .attempt_ticker
                            .take_if(|(current, _)| *current == token)
                        {
                            old.abort();
                        }
                    }
                },
                Effect::Verify { token, word } => {
                    let handle = self.spawn_verification(token, word);
                    if let Some((_, old)) = self.verification.replace((token, handle)) {
                        old.abort();
                    }
                }
                Effect::CancelVerification { token } => {
                    if let Some((_, old)) = self
                        .verification
                        .take_if(|(current, _)| *current == token)
                    {
                        debug!(%token, "Verification cancelled");
                        old.abort();
                    }
                }
                Effect::Emit(event) => {
                    debug!(%event, "Event");
                    if self.events.send(event).is_err() {
                        trace!("Event receiver dropped");
                    }
                }
            }
        }
    }

    fn spawn_ticker(&self, slot: TimerSlot, generation: Generation) -> JoinHandle<()> {
        let commands = self.internal.clone();
        let period = self.tick;
        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                let Some(commands) = commands.upgrade() else {
                    break;
                };
                if commands.send(Command::Tick { slot, generation }).is_err() {
                    break;
                }
            }
        })
    }

    fn spawn_verification(&self, token: AttemptToken, word: String) -> JoinHandle<()> {
        let commands = self.internal.clone();
        let gateway = self.gateway.clone();
        tokio::spawn(async move {
            let result = gateway.verify(&word).await;
            if let Some(commands) = commands.upgrade() {
                let _ = commands.send(Command::Verified { token, result });
            }
        })
    }

    fn stop_tasks(&mut self) {
        if let Some(handle) = self.pregame_ticker.take() {
            handle.abort();
        }
        if let Some((_, handle)) = self.attempt_ticker.take() {
            handle.abort();
        }
        if let Some((_, handle)) = self.verification.take() {
            handle.abort();
        }
    }
}
