//! Typed-transcript capability for text consoles.

use super::{Recognition, SpeechCapability, SpeechRequest};
use tokio::sync::Mutex;

/// Treats a typed line as the transcription of the next utterance.
///
/// The host stores the text with [`TranscriptSpeech::set`] right before
/// submitting; the next recognition consumes it. Submitting with nothing
/// stored counts as no input.
#[derive(Default)]
pub struct TranscriptSpeech {
    pending: Mutex<Option<String>>,
}

impl TranscriptSpeech {
    /// Creates an empty transcript slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the text for the next recognition, replacing any unused one.
    pub async fn set(&self, text: Option<String>) {
        *self.pending.lock().await = text.filter(|t| !t.trim().is_empty());
    }
}

#[async_trait::async_trait]
impl SpeechCapability for TranscriptSpeech {
    async fn recognize(&self, _request: &SpeechRequest) -> Recognition {
        match self.pending.lock().await.take() {
            Some(text) => Recognition::Candidates(vec![text]),
            None => Recognition::NoInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SpeechRequest {
        SpeechRequest {
            target: "苹果".to_string(),
            language: "zh-CN".to_string(),
            max_alternatives: 3,
        }
    }

    #[tokio::test]
    async fn test_transcript_consumed_once() {
        let speech = TranscriptSpeech::new();
        speech.set(Some("苹果".to_string())).await;
        assert_eq!(
            speech.recognize(&request()).await,
            Recognition::Candidates(vec!["苹果".to_string()])
        );
        assert_eq!(speech.recognize(&request()).await, Recognition::NoInput);
    }

    #[tokio::test]
    async fn test_blank_transcript_is_no_input() {
        let speech = TranscriptSpeech::new();
        speech.set(Some("   ".to_string())).await;
        assert_eq!(speech.recognize(&request()).await, Recognition::NoInput);
    }
}
