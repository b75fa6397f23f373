//! Error types for kd-core

use thiserror::Error;

/// Main error type for kd-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Gemini API error: {0}")]
    Api(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Diagnosis parsing error: {0}")]
    Diagnosis(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for kd-core
pub type Result<T> = std::result::Result<T, Error>;
