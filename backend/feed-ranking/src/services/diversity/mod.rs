use crate::models::{ContentType, PostScore};
use crate::services::ranking::sort_by_score_desc;
use std::collections::HashMap;
use tracing::debug;

/// Largest share of the feed a single content type may hold.
pub const MAX_CONTENT_TYPE_SHARE: f32 = 0.7;

/// Diversity Layer - content-type balancing
///
/// Trims the lowest-scoring posts of whichever type dominates the feed
/// until no type holds more than `max_share` of it or that type runs out.
/// Only ever shrinks the list.
pub struct DiversityLayer {
    max_share: f32,
}

impl Default for DiversityLayer {
    fn default() -> Self {
        Self::new(MAX_CONTENT_TYPE_SHARE)
    }
}

impl DiversityLayer {
    pub fn new(max_share: f32) -> Self {
        Self { max_share }
    }

    pub fn balance(&self, mut posts: Vec<PostScore>) -> Vec<PostScore> {
        let input_count = posts.len();

        // A feed holding a single type drains completely
        while let Some(dominant) = self.dominant_type(&posts) {
            let Some(lowest) = lowest_scoring_index(&posts, dominant) else {
                break;
            };
            posts.remove(lowest);
        }

        sort_by_score_desc(&mut posts);

        debug!(
            input_count = input_count,
            output_count = posts.len(),
            "Content type balancing completed"
        );

        posts
    }

    /// Type whose share exceeds the limit, if any.
    fn dominant_type(&self, posts: &[PostScore]) -> Option<ContentType> {
        if posts.is_empty() {
            return None;
        }

        let total = posts.len() as f32;
        type_counts(posts)
            .into_iter()
            .filter(|(_, count)| *count as f32 / total > self.max_share)
            .map(|(content_type, _)| content_type)
            .next()
    }
}

fn type_counts(posts: &[PostScore]) -> HashMap<ContentType, usize> {
    let mut counts = HashMap::new();
    for post in posts {
        *counts.entry(post.post.content_type()).or_insert(0) += 1;
    }
    counts
}

/// Lowest-scoring post of a type; among equal scores the later one goes.
fn lowest_scoring_index(posts: &[PostScore], content_type: ContentType) -> Option<usize> {
    posts
        .iter()
        .enumerate()
        .filter(|(_, p)| p.post.content_type() == content_type)
        .fold(None, |lowest: Option<(usize, f32)>, (i, p)| match lowest {
            Some((_, score)) if score < p.score => lowest,
            _ => Some((i, p.score)),
        })
        .map(|(i, _)| i)
}
