// ============================================
// Filter Stage (过滤层)
// ============================================
//
// Drops candidates the user must never see:
// - posts the user already viewed
// - posts from muted or blocked accounts
// - posts older than the filter age cutoff
// - low-quality posts (spam heuristics below)

use crate::models::{Post, UserProfile};
use crate::utils::{
    count_hashtags, count_punctuation_runs, count_urls, longest_char_run, uppercase_ratio,
};
use chrono::{DateTime, Utc};
use tracing::debug;

const MIN_CONTENT_CHARS: usize = 5;
const MAX_HASHTAGS: usize = 8;
const SHOUTING_MIN_CHARS: usize = 20;
const MAX_UPPERCASE_RATIO: f32 = 0.7;
const MAX_REPEATED_CHAR_RUN: usize = 4;
const MAX_PUNCTUATION_RUNS: usize = 2;
const MAX_URLS: usize = 3;

/// Why a candidate was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterReason {
    AlreadyViewed,
    HiddenAuthor,
    TooOld,
    LowQuality,
}

pub struct FilterLayer {
    max_age_hours: f64,
}

impl FilterLayer {
    pub fn new(max_age_hours: f64) -> Self {
        Self { max_age_hours }
    }

    /// Keep the posts that pass every rule. Relative order is preserved.
    pub fn filter(&self, posts: &[Post], profile: &UserProfile, now: DateTime<Utc>) -> Vec<Post> {
        let kept: Vec<Post> = posts
            .iter()
            .filter(|post| match self.rejection(post, profile, now) {
                Some(reason) => {
                    debug!(post_id = %post.id, reason = ?reason, "Post filtered");
                    false
                }
                None => true,
            })
            .cloned()
            .collect();

        debug!(
            input_count = posts.len(),
            kept_count = kept.len(),
            "Filter stage completed"
        );

        kept
    }

    /// First rule the post breaks, if any.
    pub fn rejection(
        &self,
        post: &Post,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Option<FilterReason> {
        if profile.has_viewed(&post.id) {
            return Some(FilterReason::AlreadyViewed);
        }
        if profile.is_hidden_author(&post.author.id) {
            return Some(FilterReason::HiddenAuthor);
        }
        if post.age_hours(now) > self.max_age_hours {
            return Some(FilterReason::TooOld);
        }
        if is_low_quality(&post.content) {
            return Some(FilterReason::LowQuality);
        }
        None
    }
}

/// Spam heuristics on raw content. Any single hit disqualifies the post.
pub fn is_low_quality(content: &str) -> bool {
    let char_count = content.chars().count();

    if char_count < MIN_CONTENT_CHARS {
        return true;
    }
    if count_hashtags(content) > MAX_HASHTAGS {
        return true;
    }
    if char_count > SHOUTING_MIN_CHARS && uppercase_ratio(content) > MAX_UPPERCASE_RATIO {
        return true;
    }
    if longest_char_run(content) > MAX_REPEATED_CHAR_RUN {
        return true;
    }
    if count_punctuation_runs(content) > MAX_PUNCTUATION_RUNS {
        return true;
    }
    count_urls(content) > MAX_URLS
}
