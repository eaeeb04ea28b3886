//! Error Types for Market Analysis

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Everything that can go wrong below the analyzer facade.
///
/// None of these escape `MarketAnalyzer::analyze`; they are logged and
/// folded into an empty `AnalysisRecord`.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid asset identifier: {0:?}")]
    InvalidAsset(String),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Upstream returned HTTP {status}")]
    Status { status: u16 },

    #[error("Upstream rate limit hit")]
    RateLimited,

    #[error("Market data source unavailable: {0}")]
    Source(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Coarse classification used in logs and diagnostics
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchErrorKind {
    Transport,
    MalformedResponse,
    UnknownAsset,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::InvalidAsset(_) | FetchError::NotFound(_) => FetchErrorKind::UnknownAsset,
            FetchError::Malformed(_) => FetchErrorKind::MalformedResponse,
            FetchError::Status { .. }
            | FetchError::RateLimited
            | FetchError::Source(_)
            | FetchError::Transport(_) => FetchErrorKind::Transport,
        }
    }

    /// Check if a later identical request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Status { status } => *status >= 500,
            FetchError::RateLimited | FetchError::Source(_) | FetchError::Transport(_) => true,
            FetchError::InvalidAsset(_) | FetchError::NotFound(_) | FetchError::Malformed(_) => false,
        }
    }
}
