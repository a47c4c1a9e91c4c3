//! Loading word pools from disk.

use crate::error::WordSourceError;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, instrument, warn};
use wordclaim_rules::WordPool;

#[derive(Debug, Deserialize)]
struct WordFile {
    words: Vec<String>,
}

/// Loads a word pool from a file.
///
/// Accepts a JSON object `{"words": [...]}`, a bare JSON array, or plain
/// text with one word per line. Blank entries are dropped. A pool that is
/// too small for a board still loads; callers check
/// [`WordPool::is_playable`].
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_word_pool(path: impl AsRef<Path>) -> Result<WordPool, WordSourceError> {
    let content = std::fs::read_to_string(path.as_ref())
        .map_err(|e| WordSourceError::new(format!("Failed to read word file: {}", e)))?;
    let pool = parse_word_pool(&content)?;

    if pool.is_playable() {
        info!(words = pool.len(), "Word pool loaded");
    } else {
        warn!(words = pool.len(), "Word pool loaded but too small for a board");
    }
    Ok(pool)
}

/// Parses word pool text in any supported format.
pub fn parse_word_pool(content: &str) -> Result<WordPool, WordSourceError> {
    let trimmed = content.trim_start();
    let words = if trimmed.starts_with('{') {
        debug!("Parsing JSON object word list");
        serde_json::from_str::<WordFile>(trimmed)
            .map_err(|e| WordSourceError::new(format!("Failed to parse word JSON: {}", e)))?
            .words
    } else if trimmed.starts_with('[') {
        debug!("Parsing JSON array word list");
        serde_json::from_str::<Vec<String>>(trimmed)
            .map_err(|e| WordSourceError::new(format!("Failed to parse word JSON: {}", e)))?
    } else {
        debug!("Parsing plain text word list");
        content.lines().map(str::to_string).collect()
    };
    Ok(WordPool::new(words))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines() {
        let pool = parse_word_pool("苹果\n\n香蕉\r\n  梨 \n").unwrap();
        assert_eq!(pool.words(), ["苹果", "香蕉", "梨"]);
    }

    #[test]
    fn test_json_object() {
        let pool = parse_word_pool(r#"{"words": ["苹果", "", "香蕉"]}"#).unwrap();
        assert_eq!(pool.words(), ["苹果", "香蕉"]);
    }

    #[test]
    fn test_json_array() {
        let pool = parse_word_pool(r#"["a", "b"]"#).unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let err = parse_word_pool(r#"{"words": 3}"#).unwrap_err();
        assert!(err.message.contains("Failed to parse word JSON"));
    }
}
