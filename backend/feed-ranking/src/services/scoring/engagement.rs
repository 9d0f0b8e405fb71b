use super::ScoringContext;
use crate::models::Post;
use crate::utils::{clamp_unit, content_words};

const INTEREST_CAP: f32 = 0.4;
const AUTHOR_AFFINITY_CAP: f32 = 0.3;
const VELOCITY_CAP: f32 = 0.2;
const RAW_ENGAGEMENT_CAP: f32 = 0.1;

/// Velocity that earns the full velocity term (interactions per hour).
const VELOCITY_SATURATION: f64 = 10.0;
/// Likes plus comments that earn the full raw engagement term.
const RAW_ENGAGEMENT_SATURATION: f32 = 100.0;

/// How likely the user is to engage with the post.
pub fn engagement_likelihood(post: &Post, ctx: &ScoringContext<'_>, reasons: &mut Vec<String>) -> f32 {
    let words = content_words(&post.content);
    let interest = clamp_unit(ctx.interest_matcher.match_ratio(&words, &ctx.profile.interests));
    if interest > 0.0 {
        reasons.push("matches interests".to_string());
    }

    let affinity = ctx.profile.author_interaction_ratio(&post.author.id).min(1.0);

    let velocity = (post.engagement_velocity(ctx.now) / VELOCITY_SATURATION).min(1.0) as f32;

    let raw = (post.engagement_count() as f32 / RAW_ENGAGEMENT_SATURATION).min(1.0);

    clamp_unit(
        interest * INTEREST_CAP
            + affinity * AUTHOR_AFFINITY_CAP
            + velocity * VELOCITY_CAP
            + raw * RAW_ENGAGEMENT_CAP,
    )
}
