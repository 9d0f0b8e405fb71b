use super::ScoringContext;
use crate::models::Post;
use crate::utils::{clamp_unit, leading_words};
use rand::Rng;

const UNSEEN_AUTHOR_BONUS: f32 = 0.3;
const UNPREFERRED_TYPE_BONUS: f32 = 0.2;
const NEW_TOPIC_BONUS: f32 = 0.1;
const NEW_TOPIC_CAP: f32 = 0.3;

pub const SERENDIPITY_PROBABILITY: f64 = 0.1;
pub const SERENDIPITY_BONUS: f32 = 0.3;

/// Topic tags of a post: explicit topics when present, otherwise its first
/// five words.
pub fn post_topics(post: &Post) -> Vec<String> {
    match &post.topics {
        Some(topics) => topics.iter().map(|t| t.to_lowercase()).collect(),
        None => leading_words(&post.content),
    }
}

/// Bonus for content outside the user's usual bubble.
pub fn diversity_boost<R: Rng + ?Sized>(
    post: &Post,
    ctx: &ScoringContext<'_>,
    rng: &mut R,
    reasons: &mut Vec<String>,
) -> f32 {
    let mut score = 0.0;

    if !ctx.recently_engaged_authors.contains(&post.author.id) {
        score += UNSEEN_AUTHOR_BONUS;
    }

    if !ctx
        .profile
        .preferences
        .content_types
        .contains(&post.content_type())
    {
        score += UNPREFERRED_TYPE_BONUS;
    }

    let new_topics = post_topics(post)
        .iter()
        .filter(|t| !ctx.recent_topics.contains(*t))
        .count();
    score += (new_topics as f32 * NEW_TOPIC_BONUS).min(NEW_TOPIC_CAP);

    if rng.gen_bool(SERENDIPITY_PROBABILITY) {
        score += SERENDIPITY_BONUS;
        reasons.push("serendipity".to_string());
    }

    clamp_unit(score)
}
