//! Rank-and-Limit Module
//!
//! Orders scored posts and caps the feed:
//! 1. Stable sort by score, descending (ties keep filter-stage order)
//! 2. Admit posts while their author is under `max_posts_per_account`
//! 3. Stop once `max_posts_per_feed` posts are admitted

use crate::config::FeedLimits;
use crate::models::PostScore;
use std::collections::HashMap;
use tracing::debug;

pub struct RankingLayer {
    max_posts_per_account: usize,
    max_posts_per_feed: usize,
}

impl RankingLayer {
    pub fn new(limits: &FeedLimits) -> Self {
        Self {
            max_posts_per_account: limits.max_posts_per_account,
            max_posts_per_feed: limits.max_posts_per_feed,
        }
    }

    pub fn rank_and_limit(&self, mut scored: Vec<PostScore>) -> Vec<PostScore> {
        let input_count = scored.len();
        sort_by_score_desc(&mut scored);

        let mut per_author: HashMap<String, usize> = HashMap::new();
        let mut admitted = Vec::with_capacity(self.max_posts_per_feed.min(scored.len()));

        for candidate in scored {
            if admitted.len() >= self.max_posts_per_feed {
                break;
            }

            let count = per_author.entry(candidate.post.author.id.clone()).or_insert(0);
            if *count < self.max_posts_per_account {
                *count += 1;
                admitted.push(candidate);
            }
        }

        debug!(
            input_count = input_count,
            admitted_count = admitted.len(),
            "Rank and limit completed"
        );

        admitted
    }
}

/// Stable descending sort by score.
pub fn sort_by_score_desc(scored: &mut [PostScore]) {
    // Note: NaN scores are treated as equal to keep the sort total
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Post, ScoreBreakdown, User};
    use chrono::Utc;

    fn scored(id: &str, author: &str, score: f32) -> PostScore {
        PostScore {
            post: Post {
                id: id.to_string(),
                author: User::new(author),
                content: "ranked content".to_string(),
                image: None,
                video: None,
                topics: None,
                created_at: Utc::now(),
                likes: vec![],
                comments: vec![],
            },
            score,
            breakdown: ScoreBreakdown::default(),
            reason: String::new(),
        }
    }

    fn ids(posts: &[PostScore]) -> Vec<&str> {
        posts.iter().map(|p| p.post.id.as_str()).collect()
    }

    #[test]
    fn test_per_account_limit_keeps_best_two() {
        let layer = RankingLayer::new(&FeedLimits::default());

        let posts = vec![
            scored("a1", "alice", 0.91),
            scored("a2", "alice", 0.99),
            scored("a3", "alice", 0.95),
            scored("a4", "alice", 0.97),
            scored("a5", "alice", 0.93),
            scored("b1", "bob", 0.10),
        ];

        let ranked = layer.rank_and_limit(posts);

        assert_eq!(ids(&ranked), vec!["a2", "a4", "b1"]);
    }

    #[test]
    fn test_feed_limit_caps_output() {
        let layer = RankingLayer::new(&FeedLimits {
            max_posts_per_account: 10,
            max_posts_per_feed: 3,
            ad_frequency: 5,
        });

        let posts = (0..10)
            .map(|i| scored(&format!("p{}", i), &format!("author{}", i), i as f32 / 10.0))
            .collect();

        let ranked = layer.rank_and_limit(posts);

        assert_eq!(ids(&ranked), vec!["p9", "p8", "p7"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let layer = RankingLayer::new(&FeedLimits::default());

        let posts = vec![
            scored("first", "a", 0.5),
            scored("second", "b", 0.5),
            scored("third", "c", 0.5),
        ];

        assert_eq!(ids(&layer.rank_and_limit(posts)), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_input() {
        let layer = RankingLayer::new(&FeedLimits::default());
        assert!(layer.rank_and_limit(Vec::new()).is_empty());
    }
}
