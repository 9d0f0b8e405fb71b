// Text and numeric helpers shared by the filter and scoring stages

use once_cell::sync::Lazy;
use regex::Regex;

static HASHTAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\w+").expect("valid hashtag regex"));
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("valid url regex"));
static PUNCTUATION_RUN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[!?.]{3,}").expect("valid punctuation regex"));

/// Clamp a score to [0, 1]. NaN maps to 0.
pub fn clamp_unit(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

pub fn count_hashtags(text: &str) -> usize {
    HASHTAG_PATTERN.find_iter(text).count()
}

pub fn count_urls(text: &str) -> usize {
    URL_PATTERN.find_iter(text).count()
}

/// Runs of three or more `!`, `?` or `.` characters.
pub fn count_punctuation_runs(text: &str) -> usize {
    PUNCTUATION_RUN_PATTERN.find_iter(text).count()
}

/// Uppercase characters over all characters.
pub fn uppercase_ratio(text: &str) -> f32 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let upper = text.chars().filter(|c| c.is_uppercase()).count();
    upper as f32 / total as f32
}

/// Length of the longest run of one repeated character.
pub fn longest_char_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<char> = None;

    for c in text.chars() {
        if Some(c) == previous {
            current += 1;
        } else {
            current = 1;
            previous = Some(c);
        }
        longest = longest.max(current);
    }

    longest
}

/// Lowercase whitespace-separated words longer than three characters.
pub fn content_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|w| w.chars().count() > 3)
        .collect()
}

/// First five lowercase words, the topic fallback for untagged posts.
pub fn leading_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .take(5)
        .map(str::to_lowercase)
        .collect()
}
