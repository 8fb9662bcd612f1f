//! Error types for GOA

use thiserror::Error;

/// Result type alias for GOA operations
pub type Result<T> = std::result::Result<T, GoaError>;

/// Main error type for GOA
#[derive(Error, Debug)]
pub enum GoaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid genomic span: {0}")]
    InvalidSpan(String),

    #[error("Invalid genome build: {0}")]
    InvalidGenomeBuild(String),

    #[error("Track not found: {0}")]
    TrackNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
