use thiserror::Error;

/// Errors at the request boundary. Ranking itself never fails.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("Invalid feed request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RankingError>;
