pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod request;
pub mod services;
pub mod utils;

pub use config::RankingConfig;
pub use engine::{rank_feed_posts, FeedRankingAlgorithm};
pub use error::{RankingError, Result};
pub use models::{Interaction, InteractionType, Post, PostScore, User, UserProfile};
pub use request::{FeedRequest, FeedResponse};
pub use services::{simple_rank_posts, InterestMatcher, TokenOverlapMatcher};
