//! Error types for arena-core

use thiserror::Error;

/// Result type alias for arena-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the HTTP layer
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid HTTP method
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Invalid listen address or path
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Body too large
    #[error("Body too large: exceeds limit of {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Rejected server configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Hyper / body error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
