use super::ScoringContext;
use crate::models::Post;
use crate::utils::clamp_unit;

const FOLLOWED_BONUS: f32 = 0.5;
const FOLLOWED_BY_AUTHOR_LIST_BONUS: f32 = 0.2;
const INTERACTION_SHARE_CAP: f32 = 0.3;
const PERSONAL_CONTENT_BONUS: f32 = 0.1;
const PERSONAL_CONTENT_MIN_SHARE: f32 = 0.5;

/// Strength of the social tie between the user and the post's author.
pub fn connection_strength(post: &Post, ctx: &ScoringContext<'_>, reasons: &mut Vec<String>) -> f32 {
    let author_id = &post.author.id;
    let mut score = 0.0;

    if ctx.profile.followed_accounts.contains(author_id) {
        score += FOLLOWED_BONUS;
        reasons.push("followed author".to_string());
    }

    if post.author.followers.iter().any(|f| *f == ctx.current_user.id) {
        score += FOLLOWED_BY_AUTHOR_LIST_BONUS;
    }

    let share = ctx.profile.author_interaction_ratio(author_id);
    score += share.min(1.0) * INTERACTION_SHARE_CAP;

    if ctx.profile.preferences.prefer_personal_content && share > PERSONAL_CONTENT_MIN_SHARE {
        score += PERSONAL_CONTENT_BONUS;
        reasons.push("frequent interaction".to_string());
    }

    clamp_unit(score)
}
