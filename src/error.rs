use thiserror::Error;

/// Every failure the round analysis can surface.
///
/// Indexer failures are already human-readable by the time they leave
/// [`crate::client`]; nothing here wraps a transport type directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzerError {
    #[error("Invalid round range provided: {0}")]
    InvalidRange(String),

    #[error("API Network Error: {0}")]
    Network(String),

    #[error("API Server Error (HTTP Status: {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Block data not found (HTTP Status: 404). Round may not exist or is not indexed yet.")]
    NotFound,

    #[error("API Request Failed: Received empty response (HTTP {0}).")]
    EmptyResponse(u16),

    #[error("API Data Error: Invalid format received ({0}).")]
    Decode(String),

    #[error("Block {0} data not found or empty.")]
    BlockNotFound(u64),

    #[error("Indexer repeated continuation token {0:?}; stopping pagination.")]
    RepeatedToken(String),

    #[error("Analysis did not finish within {0} seconds.")]
    DeadlineExceeded(u64),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
