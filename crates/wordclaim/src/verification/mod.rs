//! Speech verification behind a uniform async interface.
//!
//! A [`SpeechCapability`] turns one utterance into candidate
//! transcriptions. The [`VerificationGateway`] runs the match predicate
//! over those candidates and reduces everything to a single [`Outcome`].

mod matching;
mod scripted;
mod transcript;

pub use matching::{normalize, LooseMatch, MatchPredicate};
pub use scripted::ScriptedSpeech;
pub use transcript::TranscriptSpeech;

use crate::config::EngineConfig;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Result of verifying one utterance against a target word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Outcome {
    /// At least one candidate matched.
    #[display("matched")]
    Matched,
    /// Candidates were heard, none matched.
    #[display("not matched")]
    NotMatched,
    /// The recognizer ended without hearing anything.
    #[display("no input")]
    NoInput,
    /// The recognizer reported a failure.
    #[display("recognizer error")]
    Error,
}

/// What a speech capability heard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recognition {
    /// Zero or more candidate transcriptions, best first.
    Candidates(Vec<String>),
    /// Capture ended without a result.
    NoInput,
    /// The recognizer failed.
    Failed(String),
}

/// Parameters for one recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    /// The word the player is expected to say.
    pub target: String,
    /// Language hint, e.g. `zh-CN`.
    pub language: String,
    /// Maximum number of candidates wanted.
    pub max_alternatives: u8,
}

/// The environment has no speech capability.
///
/// Not an [`Outcome`]: it must never be counted as a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Speech recognition is not supported in this environment")]
pub struct VerificationUnsupported;

/// An external speech-to-text capability.
#[async_trait::async_trait]
pub trait SpeechCapability: Send + Sync {
    /// Whether recognition can run here at all.
    fn is_supported(&self) -> bool {
        true
    }

    /// Captures one utterance and transcribes it.
    ///
    /// Resolves exactly once per call.
    async fn recognize(&self, request: &SpeechRequest) -> Recognition;
}

/// Verifies spoken words using a capability and a match predicate.
#[derive(Clone)]
pub struct VerificationGateway {
    capability: Arc<dyn SpeechCapability>,
    predicate: Arc<dyn MatchPredicate>,
    language: String,
    max_alternatives: u8,
}

impl VerificationGateway {
    /// Creates a gateway using the default [`LooseMatch`] predicate.
    pub fn new(capability: Arc<dyn SpeechCapability>, config: &EngineConfig) -> Self {
        Self {
            capability,
            predicate: Arc::new(LooseMatch),
            language: config.language().clone(),
            max_alternatives: *config.max_alternatives(),
        }
    }

    /// Replaces the match predicate.
    pub fn with_predicate(mut self, predicate: impl MatchPredicate + 'static) -> Self {
        self.predicate = Arc::new(predicate);
        self
    }

    /// Verifies one utterance against `target`.
    ///
    /// # Errors
    ///
    /// Fails immediately with [`VerificationUnsupported`] when the
    /// capability is unavailable; nothing is captured in that case.
    #[instrument(skip(self))]
    pub async fn verify(&self, target: &str) -> Result<Outcome, VerificationUnsupported> {
        if !self.capability.is_supported() {
            warn!("Speech capability unavailable");
            return Err(VerificationUnsupported);
        }

        let request = SpeechRequest {
            target: target.trim().to_string(),
            language: self.language.clone(),
            max_alternatives: self.max_alternatives,
        };

        let outcome = match self.capability.recognize(&request).await {
            Recognition::Candidates(candidates) => {
                if candidates
                    .iter()
                    .any(|c| self.predicate.matches(c.trim(), &request.target))
                {
                    Outcome::Matched
                } else {
                    Outcome::NotMatched
                }
            }
            Recognition::NoInput => Outcome::NoInput,
            Recognition::Failed(reason) => {
                debug!(%reason, "Recognizer failed");
                Outcome::Error
            }
        };

        debug!(%outcome, "Verification finished");
        Ok(outcome)
    }
}

impl std::fmt::Debug for VerificationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationGateway")
            .field("language", &self.language)
            .field("max_alternatives", &self.max_alternatives)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(capability: ScriptedSpeech) -> VerificationGateway {
        VerificationGateway::new(Arc::new(capability), &EngineConfig::default())
    }

    #[tokio::test]
    async fn test_any_candidate_matches() {
        let speech = ScriptedSpeech::new([Recognition::Candidates(vec![
            "香蕉".to_string(),
            "我说苹果。".to_string(),
        ])]);
        assert_eq!(gateway(speech).verify("苹果").await, Ok(Outcome::Matched));
    }

    #[tokio::test]
    async fn test_empty_candidates_not_matched() {
        let speech = ScriptedSpeech::new([Recognition::Candidates(vec![])]);
        assert_eq!(gateway(speech).verify("苹果").await, Ok(Outcome::NotMatched));
    }

    #[tokio::test]
    async fn test_no_input_and_error_pass_through() {
        let speech = ScriptedSpeech::new([
            Recognition::NoInput,
            Recognition::Failed("network".to_string()),
        ]);
        let gateway = gateway(speech);
        assert_eq!(gateway.verify("苹果").await, Ok(Outcome::NoInput));
        assert_eq!(gateway.verify("苹果").await, Ok(Outcome::Error));
    }

    #[tokio::test]
    async fn test_unsupported_fails_immediately() {
        let gateway = gateway(ScriptedSpeech::unsupported());
        assert_eq!(gateway.verify("苹果").await, Err(VerificationUnsupported));
    }

    #[tokio::test]
    async fn test_custom_predicate() {
        let speech = ScriptedSpeech::new([Recognition::Candidates(vec!["APPLE".to_string()])]);
        let gateway = gateway(speech)
            .with_predicate(|candidate: &str, target: &str| candidate.eq_ignore_ascii_case(target));
        assert_eq!(gateway.verify("apple").await, Ok(Outcome::Matched));
    }
}
