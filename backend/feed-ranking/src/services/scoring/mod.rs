// ============================================
// Scoring Stage (打分层)
// ============================================
//
// Five independent sub-scores, each clamped to [0, 1], combined with the
// configured weights:
//
//   total = w_e * engagement + w_r * recency + w_c * connection
//         + w_d * diversity + w_q * quality

pub mod connection;
pub mod diversity;
pub mod engagement;
pub mod interest;
pub mod quality;
pub mod recency;

pub use diversity::post_topics;
pub use interest::{InterestMatcher, TokenOverlapMatcher};

use crate::config::{RankingConfig, RankingWeights};
use crate::models::{Post, PostScore, ScoreBreakdown, User, UserProfile};
use crate::utils::clamp_unit;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

/// Trailing window for "recently seen" authors and topics.
const RECENT_WINDOW_HOURS: i64 = 24;

/// Everything a sub-score needs besides the post itself.
pub struct ScoringContext<'a> {
    pub profile: &'a UserProfile,
    pub current_user: &'a User,
    pub config: &'a RankingConfig,
    pub now: DateTime<Utc>,
    /// Authors the user interacted with inside the trailing window.
    pub recently_engaged_authors: HashSet<String>,
    /// Preferred topics plus topics of candidates interacted with recently.
    pub recent_topics: HashSet<String>,
    pub interest_matcher: &'a dyn InterestMatcher,
}

impl<'a> ScoringContext<'a> {
    /// Built once per ranking call from the full, unfiltered candidate list.
    pub fn new(
        profile: &'a UserProfile,
        current_user: &'a User,
        config: &'a RankingConfig,
        now: DateTime<Utc>,
        candidates: &[Post],
        interest_matcher: &'a dyn InterestMatcher,
    ) -> Self {
        let window_start = now - Duration::hours(RECENT_WINDOW_HOURS);
        let recent: Vec<_> = profile
            .interaction_history
            .iter()
            .filter(|i| i.timestamp >= window_start)
            .collect();

        let recently_engaged_authors = recent.iter().map(|i| i.user_id.clone()).collect();

        let recent_post_ids: HashSet<&str> = recent.iter().map(|i| i.post_id.as_str()).collect();
        let mut recent_topics: HashSet<String> = profile
            .preferences
            .topics
            .iter()
            .map(|t| t.to_lowercase())
            .collect();
        for post in candidates
            .iter()
            .filter(|p| recent_post_ids.contains(p.id.as_str()))
        {
            recent_topics.extend(post_topics(post));
        }

        Self {
            profile,
            current_user,
            config,
            now,
            recently_engaged_authors,
            recent_topics,
            interest_matcher,
        }
    }
}

pub struct ScoringLayer {
    weights: RankingWeights,
}

impl ScoringLayer {
    pub fn new(weights: RankingWeights) -> Self {
        Self { weights }
    }

    /// Score every post. Output order follows input order.
    pub fn score_posts<R: Rng + ?Sized>(
        &self,
        posts: Vec<Post>,
        ctx: &ScoringContext<'_>,
        rng: &mut R,
    ) -> Vec<PostScore> {
        let scored: Vec<PostScore> = posts
            .into_iter()
            .map(|post| self.score_post(post, ctx, rng))
            .collect();

        debug!(scored_count = scored.len(), "Scoring stage completed");

        scored
    }

    pub fn score_post<R: Rng + ?Sized>(
        &self,
        post: Post,
        ctx: &ScoringContext<'_>,
        rng: &mut R,
    ) -> PostScore {
        let mut reasons = Vec::new();

        let breakdown = ScoreBreakdown {
            engagement: engagement::engagement_likelihood(&post, ctx, &mut reasons),
            recency: recency::recency(&post, ctx, &mut reasons),
            connection: connection::connection_strength(&post, ctx, &mut reasons),
            diversity: diversity::diversity_boost(&post, ctx, rng, &mut reasons),
            quality: quality::quality(&post, &mut reasons),
        };

        let score = self.combine(&breakdown);
        let reason = format_reason(&breakdown, &reasons);

        debug!(post_id = %post.id, score = score, reason = %reason, "Post scored");

        PostScore {
            post,
            score,
            breakdown,
            reason,
        }
    }

    /// Weighted sum of the sub-scores, clamped to [0, 1].
    pub fn combine(&self, b: &ScoreBreakdown) -> f32 {
        let w = &self.weights;
        clamp_unit(
            w.engagement * b.engagement
                + w.recency * b.recency
                + w.connection * b.connection
                + w.diversity * b.diversity
                + w.quality * b.quality,
        )
    }
}

fn format_reason(b: &ScoreBreakdown, reasons: &[String]) -> String {
    let mut reason = format!(
        "engagement={:.2} recency={:.2} connection={:.2} diversity={:.2} quality={:.2}",
        b.engagement, b.recency, b.connection, b.diversity, b.quality
    );
    if !reasons.is_empty() {
        reason.push_str("; ");
        reason.push_str(&reasons.join(", "));
    }
    reason
}
