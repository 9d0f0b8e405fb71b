use crate::config::RankingConfig;
use crate::engine::FeedRankingAlgorithm;
use crate::error::Result;
use crate::models::{Interaction, Post, PostScore, User, UserProfile};
use crate::services::simple_rank_posts;
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::{info, warn};

/// A ranking request as handed over by the host API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRequest {
    pub posts: Vec<Post>,
    pub current_user: User,
    /// Full profile. When absent one is built from `current_user`'s follow list.
    #[serde(default)]
    pub profile: Option<UserProfile>,
    /// Extra history appended to the profile's own.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    #[serde(default)]
    pub config: Option<RankingConfig>,
    /// Overrides the config's ad pool when non-empty.
    #[serde(default)]
    pub ads: Vec<Post>,
    /// Serendipity seed. One is drawn per request when absent, so `posts`
    /// and `breakdown` always share the same draws.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub posts: Vec<Post>,
    /// Set when the velocity-only fallback produced `posts`.
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<PostScore>>,
}

impl FeedRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Rank the request with the full pipeline. `fallback_config` applies
    /// when the request carries no config of its own.
    pub fn rank(self, fallback_config: RankingConfig, with_breakdown: bool) -> FeedResponse {
        if self.current_user.id.is_empty() {
            warn!(
                post_count = self.posts.len(),
                "Feed request without a user, using fallback ranking"
            );
            return FeedResponse {
                posts: simple_rank_posts(self.posts),
                degraded: true,
                breakdown: None,
            };
        }

        let mut config = self.config.unwrap_or(fallback_config);
        if !self.ads.is_empty() {
            config.ad_pool = Some(self.ads);
        }

        let mut profile = self
            .profile
            .unwrap_or_else(|| UserProfile::from_user(&self.current_user, Vec::new()));
        profile.interaction_history.extend(self.interactions);

        let seed = self.seed.unwrap_or_else(rand::random);
        let engine = FeedRankingAlgorithm::new(profile, self.current_user)
            .with_config(config)
            .with_seed(seed);

        let posts = engine.rank_posts(&self.posts);
        let breakdown = with_breakdown.then(|| engine.get_ranking_breakdown(&self.posts));

        info!(feed_len = posts.len(), seed = seed, "Feed request ranked");

        FeedResponse {
            posts,
            degraded: false,
            breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RankingError;

    const REQUEST: &str = r#"{
        "posts": [
            {"id": "p1", "author": {"id": "alice"}, "content": "first post of the day",
             "createdAt": "2099-01-01T00:00:00Z", "likes": ["x", "y"]},
            {"id": "p2", "author": {"id": "blocked"}, "content": "nobody should see this",
             "createdAt": "2099-01-01T00:00:00Z"},
            {"id": "p3", "author": {"id": "carol"}, "content": "a photo from the harbour",
             "image": "harbour.jpg", "createdAt": "2099-01-01T00:00:00Z", "likes": ["z"]}
        ],
        "currentUser": {"id": "me", "following": ["alice"]},
        "profile": {"blockedAccounts": ["blocked"]},
        "seed": 11
    }"#;

    #[test]
    fn test_request_decodes_with_defaults() {
        let request = FeedRequest::from_json(REQUEST).unwrap();

        assert_eq!(request.posts.len(), 3);
        assert_eq!(request.posts[0].like_count(), 2);
        assert!(request.config.is_none());
        assert!(request.ads.is_empty());
        assert_eq!(request.seed, Some(11));
    }

    #[test]
    fn test_rank_applies_profile() {
        let request = FeedRequest::from_json(REQUEST).unwrap();

        let response = request.rank(RankingConfig::default(), true);

        assert!(!response.degraded);
        let ids: Vec<&str> = response.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(!ids.contains(&"p2"));
        assert_eq!(response.breakdown.map(|b| b.len()), Some(2));
    }

    #[test]
    fn test_missing_user_degrades_to_fallback() {
        let mut request = FeedRequest::from_json(REQUEST).unwrap();
        request.current_user = User::default();

        let response = request.rank(RankingConfig::default(), false);

        assert!(response.degraded);
        let ids: Vec<&str> = response.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3", "p2"]);
    }

    #[test]
    fn test_unseeded_breakdown_matches_feed_order() {
        let posts: Vec<Post> = (0..8)
            .map(|i| Post {
                id: format!("p{}", i),
                author: User::new(&format!("author{}", i)),
                content: format!("weekend notes number {} from the coast", i),
                image: (i % 2 == 0).then(|| format!("p{}.jpg", i)),
                video: None,
                topics: None,
                created_at: chrono::Utc::now(),
                likes: vec![],
                comments: vec![],
            })
            .collect();
        let request = FeedRequest {
            posts,
            current_user: User::new("me"),
            profile: None,
            interactions: vec![],
            config: None,
            ads: vec![],
            seed: None,
        };

        let response = request.rank(RankingConfig::default(), true);
        let breakdown = response.breakdown.unwrap();

        // Identical posts apart from serendipity: the feed order must follow
        // the scores reported in the breakdown
        let scores: Vec<f32> = response
            .posts
            .iter()
            .map(|post| {
                breakdown
                    .iter()
                    .find(|s| s.post.id == post.id)
                    .map(|s| s.score)
                    .unwrap()
            })
            .collect();
        assert!(!scores.is_empty());
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_malformed_request_is_rejected() {
        let err = FeedRequest::from_json("{\"posts\": 7}").unwrap_err();
        assert!(matches!(err, RankingError::InvalidRequest(_)));
    }
}
