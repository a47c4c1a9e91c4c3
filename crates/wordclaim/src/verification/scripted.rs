//! Scripted speech capability for tests and demos.

use super::{Recognition, SpeechCapability, SpeechRequest};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Replays a fixed queue of recognitions, one per call.
///
/// Once the queue is empty every call resolves to
/// [`Recognition::NoInput`].
pub struct ScriptedSpeech {
    responses: Mutex<VecDeque<Recognition>>,
    delay: Option<Duration>,
    supported: bool,
}

impl ScriptedSpeech {
    /// Creates a capability that answers with `responses` in order.
    pub fn new(responses: impl IntoIterator<Item = Recognition>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            delay: None,
            supported: true,
        }
    }

    /// Creates a capability that reports itself unavailable.
    pub fn unsupported() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            delay: None,
            supported: false,
        }
    }

    /// Waits `delay` before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Appends another response.
    pub async fn push(&self, recognition: Recognition) {
        self.responses.lock().await.push_back(recognition);
    }

    /// Responses not yet consumed.
    pub async fn remaining(&self) -> usize {
        self.responses.lock().await.len()
    }
}

#[async_trait::async_trait]
impl SpeechCapability for ScriptedSpeech {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn recognize(&self, request: &SpeechRequest) -> Recognition {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.responses.lock().await.pop_front();
        debug!(target_word = %request.target, ?next, "Scripted recognition");
        next.unwrap_or(Recognition::NoInput)
    }
}
