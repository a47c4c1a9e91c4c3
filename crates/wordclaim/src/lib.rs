//! Wordclaim engine - turns, timed attempts and spoken verification
//!
//! This library drives a two-player word-claiming game on a 10×10 board.
//! Players take turns selecting a cell and saying the word printed on it;
//! a verified word claims the cell and five claimed cells in a line win.
//!
//! # Architecture
//!
//! - **Session**: [`GameSession`], a synchronous state machine returning [`Effect`]s
//! - **Attempts**: [`AttemptController`], timed tries racing verification results
//! - **Turns**: [`TurnController`], current player, failure budget, selection lock
//! - **Verification**: [`VerificationGateway`] over a pluggable [`SpeechCapability`]
//! - **Runner**: [`spawn`], a tokio task carrying out effects with real timers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wordclaim::{spawn, EngineConfig, GameSession, ScriptedSpeech, VerificationGateway};
//! use wordclaim_rules::WordPool;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = EngineConfig::default();
//! let pool = WordPool::new((0..100).map(|i| format!("word{i}")));
//! let gateway = VerificationGateway::new(Arc::new(ScriptedSpeech::new(Vec::new())), &config);
//!
//! let (handle, mut events, _join) = spawn(GameSession::new(pool, &config), gateway);
//! handle.start().await?;
//! while let Some(event) = events.recv().await {
//!     println!("{event}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod attempt;
mod config;
mod effect;
mod error;
mod events;
pub mod invariants;
mod runner;
mod session;
mod timer;
mod turn;
mod verification;
mod words;

// Crate-level exports - Configuration
pub use config::{ConfigError, EngineConfig};

// Crate-level exports - Errors
pub use error::{SelectionError, SessionError, WordSourceError};

// Crate-level exports - Timers
pub use timer::{Countdown, Generation, Tick, TimerState};

// Crate-level exports - Attempts and turns
pub use attempt::{AttemptController, AttemptPhase, AttemptStep, AttemptToken, FailureReason};
pub use turn::{TurnController, TurnDecision};

// Crate-level exports - Session
pub use effect::{Effect, TimerSlot};
pub use events::{Cue, GameEvent};
pub use session::{AttemptView, GameSession, SessionSnapshot, Status};

// Crate-level exports - Verification
pub use verification::{
    normalize, LooseMatch, MatchPredicate, Outcome, Recognition, ScriptedSpeech,
    SpeechCapability, SpeechRequest, TranscriptSpeech, VerificationGateway,
    VerificationUnsupported,
};

// Crate-level exports - Runner
pub use runner::{spawn, HandleError, SessionHandle};

// Crate-level exports - Word sources
pub use words::{load_word_pool, parse_word_pool};
