//! Degraded-mode ranking
//!
//! Orders posts purely by engagement velocity when the full pipeline cannot
//! run. Nothing is filtered and no limits apply: every input post comes back.
//!
//! Algorithm:
//! - velocity = (likes + comments) / (age_hours + 1)
//! - stable sort, highest velocity first

use crate::models::Post;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Rank posts by engagement velocity as of now.
pub fn simple_rank_posts(posts: Vec<Post>) -> Vec<Post> {
    simple_rank_posts_at(posts, Utc::now())
}

/// Rank posts by engagement velocity as of `now`.
pub fn simple_rank_posts_at(posts: Vec<Post>, now: DateTime<Utc>) -> Vec<Post> {
    let mut scored: Vec<(Post, f64)> = posts
        .into_iter()
        .map(|post| {
            let velocity = post.engagement_velocity(now);
            (post, velocity)
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    debug!("Fallback ranking applied to {} posts", scored.len());

    scored.into_iter().map(|(post, _)| post).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn create_test_post(id: &str, likes: usize, created_at: DateTime<Utc>) -> Post {
        Post {
            id: id.to_string(),
            author: User::new("author"),
            content: "Test content".to_string(),
            image: None,
            video: None,
            topics: None,
            created_at,
            likes: (0..likes).map(|i| format!("u{}", i)).collect(),
            comments: vec![],
        }
    }

    #[test]
    fn test_orders_by_velocity_descending() {
        let now = Utc::now();

        // Age zero, so velocity equals the like count.
        let posts = vec![
            create_test_post("five", 5, now),
            create_test_post("one", 1, now),
            create_test_post("three", 3, now),
        ];

        let ranked = simple_rank_posts_at(posts, now);
        let ids: Vec<&str> = ranked.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["five", "three", "one"]);
    }

    #[test]
    fn test_fallback_rank_posts_empty_list() {
        assert!(simple_rank_posts(vec![]).is_empty());
    }

    #[test]
    fn test_older_post_needs_more_engagement() {
        let now = Utc::now();
        let posts = vec![
            create_test_post("old", 30, now - chrono::Duration::hours(9)),
            create_test_post("new", 5, now),
        ];

        // 30 / 10 = 3.0 vs 5 / 1 = 5.0
        let ranked = simple_rank_posts_at(posts, now);
        assert_eq!(ranked[0].id, "new");
    }
}
