use super::ScoringContext;
use crate::models::Post;
use crate::utils::clamp_unit;

const STALE_PENALTY: f64 = 0.5;
const TRENDING_BOOST: f64 = 0.2;

/// Hyperbolic time decay with a boost for posts inside the trending window.
///
/// The stale penalty only fires when the filter cutoff is configured wider
/// than `time_decay.max_age_hours`; with a shared cutoff such posts never
/// reach scoring.
pub fn recency(post: &Post, ctx: &ScoringContext<'_>, reasons: &mut Vec<String>) -> f32 {
    let decay = &ctx.config.time_decay;
    let age_hours = post.age_hours(ctx.now);

    let mut score = 1.0 / (1.0 + age_hours / decay.half_life_hours.max(f64::EPSILON));

    if age_hours > decay.max_age_hours {
        score *= STALE_PENALTY;
        reasons.push("stale".to_string());
    }

    if let Some(trending) = ctx.config.trending_threshold {
        if age_hours < trending.max_age_hours && post.engagement_count() > trending.min_engagement {
            score = (score + TRENDING_BOOST).min(1.0);
            reasons.push("trending".to_string());
        }
    }

    clamp_unit(score as f32)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{context_for, create_test_post};
    use super::*;
    use crate::config::{RankingConfig, TrendingThreshold};
    use crate::models::{User, UserProfile};
    use chrono::{Duration, Utc};

    #[test]
    fn test_half_life_halves_score() {
        let now = Utc::now();
        let profile = UserProfile::default();
        let user = User::new("me");
        let config = RankingConfig::default();
        let ctx = context_for(&profile, &user, &config, now, &[]);

        let fresh = create_test_post("fresh", "a", "brand new post", now, 0, 0);
        let half = create_test_post("half", "a", "twelve hours old", now - Duration::hours(12), 0, 0);

        assert!((recency(&fresh, &ctx, &mut Vec::new()) - 1.0).abs() < 1e-6);
        assert!((recency(&half, &ctx, &mut Vec::new()) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_trending_boost_requires_both_thresholds() {
        let now = Utc::now();
        let profile = UserProfile::default();
        let user = User::new("me");
        let config = RankingConfig {
            trending_threshold: Some(TrendingThreshold {
                min_engagement: 10,
                max_age_hours: 24.0,
            }),
            ..Default::default()
        };
        let ctx = context_for(&profile, &user, &config, now, &[]);
        let created = now - Duration::hours(12);

        let hot = create_test_post("hot", "a", "going viral right now", created, 11, 0);
        let quiet = create_test_post("quiet", "a", "going nowhere right now", created, 10, 0);

        let mut reasons = Vec::new();
        let hot_score = recency(&hot, &ctx, &mut reasons);
        let quiet_score = recency(&quiet, &ctx, &mut Vec::new());

        assert!(reasons.contains(&"trending".to_string()));
        assert!((quiet_score - 0.5).abs() < 1e-6);
        assert!((hot_score - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_trending_boost_caps_at_one() {
        let now = Utc::now();
        let profile = UserProfile::default();
        let user = User::new("me");
        let config = RankingConfig::default();
        let ctx = context_for(&profile, &user, &config, now, &[]);

        let post = create_test_post("hot", "a", "fresh and popular", now - Duration::minutes(30), 40, 5);
        assert_eq!(recency(&post, &ctx, &mut Vec::new()), 1.0);
    }

    #[test]
    fn test_trending_disabled_without_threshold() {
        let now = Utc::now();
        let profile = UserProfile::default();
        let user = User::new("me");
        let config = RankingConfig {
            trending_threshold: None,
            ..Default::default()
        };
        let ctx = context_for(&profile, &user, &config, now, &[]);

        let post = create_test_post("hot", "a", "going viral right now", now - Duration::minutes(30), 50, 0);
        let mut reasons = Vec::new();
        recency(&post, &ctx, &mut reasons);

        assert!(reasons.is_empty());
    }

    #[test]
    fn test_stale_penalty_when_cutoffs_diverge() {
        let now = Utc::now();
        let profile = UserProfile::default();
        let user = User::new("me");
        let mut config = RankingConfig::default();
        config.filter.max_age_hours = Some(96.0);
        let ctx = context_for(&profile, &user, &config, now, &[]);

        let post = create_test_post("old", "a", "sixty hours old", now - Duration::hours(60), 0, 0);
        let expected = (1.0 / (1.0 + 60.0 / 12.0)) * 0.5;

        assert!((recency(&post, &ctx, &mut Vec::new()) as f64 - expected).abs() < 1e-6);
    }
}
