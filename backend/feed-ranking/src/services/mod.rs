pub mod ads;
pub mod diversity;
pub mod fallback;
pub mod filter;
pub mod ranking;
pub mod scoring;

pub use ads::AdInsertionLayer;
pub use diversity::DiversityLayer;
pub use fallback::simple_rank_posts;
pub use filter::FilterLayer;
pub use ranking::RankingLayer;
pub use scoring::{InterestMatcher, ScoringContext, ScoringLayer, TokenOverlapMatcher};
