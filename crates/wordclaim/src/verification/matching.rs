//! Match predicates between a spoken candidate and the target word.

/// Decides whether a transcription counts as saying the target word.
pub trait MatchPredicate: Send + Sync {
    /// Returns true when `candidate` counts as saying `target`.
    fn matches(&self, candidate: &str, target: &str) -> bool;
}

impl<F> MatchPredicate for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn matches(&self, candidate: &str, target: &str) -> bool {
        self(candidate, target)
    }
}

/// Default predicate: punctuation- and whitespace-insensitive, and the
/// candidate may contain the target inside a longer phrase.
#[derive(Debug, Clone, Copy, Default)]
pub struct LooseMatch;

impl MatchPredicate for LooseMatch {
    fn matches(&self, candidate: &str, target: &str) -> bool {
        let candidate = normalize(candidate);
        let target = normalize(target);
        if candidate.is_empty() || target.is_empty() {
            return false;
        }
        candidate == target || candidate.contains(&target)
    }
}

const FULL_WIDTH_PUNCTUATION: &[char] = &[
    '，', '。', '！', '？', '、', '；', '：', '“', '”', '‘', '’', '（', '）', '《', '》', '…', '·', '—',
];

/// Strips whitespace and punctuation (ASCII and full-width).
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !c.is_whitespace() && !c.is_ascii_punctuation() && !FULL_WIDTH_PUNCTUATION.contains(c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_space() {
        assert_eq!(normalize(" 你 好，世界！"), "你好世界");
        assert_eq!(normalize("hello, world."), "helloworld");
    }

    #[test]
    fn test_exact_and_contained_match() {
        assert!(LooseMatch.matches("苹果", "苹果"));
        assert!(LooseMatch.matches("我想吃苹果。", "苹果"));
        assert!(!LooseMatch.matches("苹", "苹果"));
    }

    #[test]
    fn test_empty_never_matches() {
        assert!(!LooseMatch.matches("", "苹果"));
        assert!(!LooseMatch.matches("苹果", "，。"));
    }
}
