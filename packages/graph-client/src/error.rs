//! Error types for the Graph client.

use thiserror::Error;

/// Result type for Graph client operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Graph client errors.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Client could not be built (bad proxy URL, TLS backend failure)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout, undecodable body)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API error (non-2xx response)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl GraphError {
    /// HTTP status for API rejections, `None` for everything else.
    pub fn status(&self) -> Option<u16> {
        match self {
            GraphError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
