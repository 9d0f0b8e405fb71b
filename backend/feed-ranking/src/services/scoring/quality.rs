use crate::models::Post;
use crate::utils::{clamp_unit, count_hashtags};

const BASE_QUALITY: f32 = 0.5;
const VERIFIED_BONUS: f32 = 0.2;
const CLICKBAIT_PENALTY: f32 = 0.3;

/// Lowercase phrases that mark a post as clickbait.
pub const CLICKBAIT_PHRASES: &[&str] = &[
    "you won't believe",
    "shocking",
    "click here",
    "doctors hate",
    "what happens next",
    "will blow your mind",
    "gone wrong",
    "number 7 will",
    "must see",
    "this one trick",
];

pub fn is_clickbait(content: &str) -> bool {
    let lowered = content.to_lowercase();
    CLICKBAIT_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

/// Content quality shaped by author trust, length, hashtags, engagement mix
/// and clickbait phrasing.
pub fn quality(post: &Post, reasons: &mut Vec<String>) -> f32 {
    let mut score = BASE_QUALITY;

    if post.author.verified {
        score += VERIFIED_BONUS;
        reasons.push("verified author".to_string());
    }

    let length = post.content.chars().count();
    if (50..=500).contains(&length) {
        score += 0.1;
    } else if length < 10 {
        score -= 0.2;
    } else if length > 1000 {
        score -= 0.1;
    }

    let hashtags = count_hashtags(&post.content);
    if (1..=3).contains(&hashtags) {
        score += 0.1;
    } else if hashtags > 5 {
        score -= 0.2;
    }

    let like_comment_ratio = post.like_count() as f32 / post.comment_count().max(1) as f32;
    if (2.0..=10.0).contains(&like_comment_ratio) {
        score += 0.1;
    }

    if is_clickbait(&post.content) {
        score -= CLICKBAIT_PENALTY;
        reasons.push("clickbait".to_string());
    }

    clamp_unit(score)
}
