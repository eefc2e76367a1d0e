//! Error types

use thiserror::Error;

/// Game errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Player name and move are required")]
    MissingFields,

    #[error("Invalid move: {0}")]
    InvalidMove(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GameError>;
