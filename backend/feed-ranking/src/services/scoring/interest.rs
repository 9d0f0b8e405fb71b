use std::collections::HashSet;

/// Matches post content against a user's interests.
///
/// Implementations return a ratio in [0, 1]; the scoring layer clamps
/// whatever comes back before weighting it.
#[cfg_attr(test, mockall::automock)]
pub trait InterestMatcher: Send + Sync {
    fn match_ratio(&self, content_words: &[String], interests: &HashSet<String>) -> f32;
}

/// Lowercase token overlap between content words and interest terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenOverlapMatcher;

impl InterestMatcher for TokenOverlapMatcher {
    fn match_ratio(&self, content_words: &[String], interests: &HashSet<String>) -> f32 {
        if interests.is_empty() || content_words.is_empty() {
            return 0.0;
        }

        let interests: HashSet<String> = interests.iter().map(|i| i.to_lowercase()).collect();
        let matched: HashSet<&str> = content_words
            .iter()
            .map(String::as_str)
            .filter(|w| interests.contains(*w))
            .collect();

        (matched.len() as f32 / interests.len().max(1) as f32).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_overlap_counts_distinct_matches() {
        let matcher = TokenOverlapMatcher;
        let ratio = matcher.match_ratio(
            &words(&["rust", "rust", "compiler", "coffee"]),
            &set(&["Rust", "hiking"]),
        );
        assert!((ratio - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overlap_without_interests_is_zero() {
        let matcher = TokenOverlapMatcher;
        assert_eq!(matcher.match_ratio(&words(&["rust"]), &HashSet::new()), 0.0);
        assert_eq!(matcher.match_ratio(&[], &set(&["rust"])), 0.0);
    }
}
