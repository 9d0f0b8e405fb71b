//! Feed ranking engine
//!
//! Pipeline, strictly in order:
//!
//! 1. Filter   - drop viewed, hidden, too old and low-quality posts
//! 2. Score    - five clamped sub-scores, weighted sum
//! 3. Rank     - sort by score, cap per author and per feed
//! 4. Balance  - keep any content type at or under 70% of the feed
//! 5. Ads      - splice ads in every `ad_frequency` organic posts
//!
//! The engine never fails: malformed config fields fall back to defaults and
//! an empty profile behaves like a new user with no preferences.

use crate::config::RankingConfig;
use crate::models::{Interaction, Post, PostScore, User, UserProfile};
use crate::services::{
    AdInsertionLayer, DiversityLayer, FilterLayer, InterestMatcher, RankingLayer, ScoringContext,
    ScoringLayer, TokenOverlapMatcher,
};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

pub struct FeedRankingAlgorithm {
    profile: UserProfile,
    current_user: User,
    config: RankingConfig,
    /// Reseeded on every call so repeated calls rank identically.
    seed: Option<u64>,
    clock: Option<DateTime<Utc>>,
    interest_matcher: Box<dyn InterestMatcher>,
}

impl FeedRankingAlgorithm {
    /// Engine with default configuration.
    pub fn new(mut profile: UserProfile, current_user: User) -> Self {
        if profile.user_id.is_empty() {
            profile.user_id = current_user.id.clone();
        }

        Self {
            profile,
            current_user,
            config: RankingConfig::default(),
            seed: None,
            clock: None,
            interest_matcher: Box::new(TokenOverlapMatcher),
        }
    }

    /// Use `config`, with malformed fields replaced by defaults.
    pub fn with_config(mut self, config: RankingConfig) -> Self {
        self.config = config.sanitized();
        self
    }

    /// Fix the serendipity draws.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rank as of `now` instead of the wall clock.
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    pub fn with_interest_matcher(mut self, matcher: impl InterestMatcher + 'static) -> Self {
        self.interest_matcher = Box::new(matcher);
        self
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Run the full pipeline and return the feed in display order.
    pub fn rank_posts(&self, posts: &[Post]) -> Vec<Post> {
        if posts.is_empty() {
            return Vec::new();
        }

        let now = self.now();
        let scored = self.filter_and_score(posts, now);
        let scored_count = scored.len();

        let ranked = RankingLayer::new(&self.config.limits).rank_and_limit(scored);
        let balanced = DiversityLayer::default().balance(ranked);
        let organic_count = balanced.len();

        let organic: Vec<Post> = balanced.into_iter().map(|s| s.post).collect();
        let feed = AdInsertionLayer::new(
            self.config.limits.ad_frequency,
            self.config.limits.max_posts_per_feed,
        )
        .insert_ads(organic, self.config.ad_pool.as_deref());

        info!(
            user_id = %self.profile.user_id,
            candidates = posts.len(),
            scored = scored_count,
            organic = organic_count,
            feed_len = feed.len(),
            "Feed ranked"
        );

        feed
    }

    /// Filter and score only, for diagnostics. No limits, balancing or ads.
    pub fn get_ranking_breakdown(&self, posts: &[Post]) -> Vec<PostScore> {
        if posts.is_empty() {
            return Vec::new();
        }
        self.filter_and_score(posts, self.now())
    }

    /// Record an interaction. Applies from the next ranking call on.
    pub fn update_interaction(&mut self, interaction: Interaction) {
        debug!(
            post_id = %interaction.post_id,
            interaction_type = ?interaction.interaction_type,
            "Interaction recorded"
        );
        self.profile.interaction_history.push(interaction);
    }

    fn filter_and_score(&self, posts: &[Post], now: DateTime<Utc>) -> Vec<PostScore> {
        // Built from the raw candidates before filtering removes any of them
        let ctx = ScoringContext::new(
            &self.profile,
            &self.current_user,
            &self.config,
            now,
            posts,
            self.interest_matcher.as_ref(),
        );

        let filtered =
            FilterLayer::new(self.config.filter_max_age_hours()).filter(posts, &self.profile, now);

        let mut rng = self.rng();
        ScoringLayer::new(self.config.weights).score_posts(filtered, &ctx, &mut rng)
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.unwrap_or_else(Utc::now)
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Rank `posts` for `current_user` using a profile built from their follow
/// list and `interactions`.
pub fn rank_feed_posts(
    posts: &[Post],
    current_user: &User,
    interactions: Vec<Interaction>,
    config: Option<RankingConfig>,
) -> Vec<Post> {
    let profile = UserProfile::from_user(current_user, interactions);
    let engine = FeedRankingAlgorithm::new(profile, current_user.clone());
    let engine = match config {
        Some(config) => engine.with_config(config),
        None => engine,
    };
    engine.rank_posts(posts)
}
