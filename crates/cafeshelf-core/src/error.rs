//! Error types for cafeshelf-core

use thiserror::Error;

/// Result type alias using cafeshelf-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cafeshelf-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Authentication error
    #[error("Auth error: {0}")]
    Auth(#[from] crate::auth::AuthError),

    /// Blob upload failed
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Listing record write failed
    #[error("Write failed: {0}")]
    Write(String),

    /// Cover image URL resolution failed
    #[error("URL resolution failed: {0}")]
    Resolution(String),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Event stream error
    #[error("Event stream error: {0}")]
    Stream(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
