use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Account as seen by the ranking engine, used both for post authors and
/// for the user the feed is built for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: String,
    pub username: String,
    pub verified: bool,
    pub followers: Vec<String>,
    pub following: Vec<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            username: id.clone(),
            id,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Candidate post. Read-only from the engine's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author: User,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    /// Explicit topic tags. When absent, topics are derived from content.
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Likes plus comments.
    pub fn engagement_count(&self) -> usize {
        self.like_count() + self.comment_count()
    }

    pub fn content_type(&self) -> ContentType {
        if self.video.is_some() {
            ContentType::Video
        } else if self.image.is_some() {
            ContentType::Image
        } else {
            ContentType::Text
        }
    }

    /// Age in fractional hours, never negative (clock skew puts future posts at 0).
    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        let age_ms = (now - self.created_at).num_milliseconds().max(0);
        age_ms as f64 / 3_600_000.0
    }

    /// `(likes + comments) / (age_hours + 1)`
    pub fn engagement_velocity(&self, now: DateTime<Utc>) -> f64 {
        self.engagement_count() as f64 / (self.age_hours(now) + 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Image,
    Video,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::Video => "video",
        }
    }

    pub fn all() -> [ContentType; 3] {
        [ContentType::Text, ContentType::Image, ContentType::Video]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    Like,
    Comment,
    Share,
    View,
    Skip,
}

/// One entry of a user's interaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    /// Author of the post the interaction targeted.
    pub user_id: String,
    pub post_id: String,
    #[serde(rename = "type")]
    pub interaction_type: InteractionType,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub content_types: Vec<ContentType>,
    pub topics: Vec<String>,
    pub muted_accounts: HashSet<String>,
    pub prefer_personal_content: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            content_types: ContentType::all().to_vec(),
            topics: Vec::new(),
            muted_accounts: HashSet::new(),
            prefer_personal_content: false,
        }
    }
}

/// Everything the engine knows about the user a feed is ranked for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub user_id: String,
    pub interests: HashSet<String>,
    pub followed_accounts: HashSet<String>,
    pub blocked_accounts: HashSet<String>,
    pub interaction_history: Vec<Interaction>,
    pub preferences: Preferences,
}

impl UserProfile {
    /// Minimal profile built from the user's own follow list.
    pub fn from_user(user: &User, interactions: Vec<Interaction>) -> Self {
        Self {
            user_id: user.id.clone(),
            followed_accounts: user.following.iter().cloned().collect(),
            interaction_history: interactions,
            ..Default::default()
        }
    }

    pub fn has_viewed(&self, post_id: &str) -> bool {
        self.interaction_history
            .iter()
            .any(|i| i.interaction_type == InteractionType::View && i.post_id == post_id)
    }

    pub fn is_hidden_author(&self, author_id: &str) -> bool {
        self.blocked_accounts.contains(author_id)
            || self.preferences.muted_accounts.contains(author_id)
    }

    /// Share of the whole interaction history directed at `author_id`.
    pub fn author_interaction_ratio(&self, author_id: &str) -> f32 {
        let total = self.interaction_history.len().max(1);
        let with_author = self
            .interaction_history
            .iter()
            .filter(|i| i.user_id == author_id)
            .count();
        with_author as f32 / total as f32
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub engagement: f32,
    pub recency: f32,
    pub connection: f32,
    pub diversity: f32,
    pub quality: f32,
}

/// A post paired with its score. Built fresh for every ranking call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostScore {
    pub post: Post,
    pub score: f32,
    pub breakdown: ScoreBreakdown,
    pub reason: String,
}
