//! Error types for lore-core

use thiserror::Error;

/// Result type alias using lore-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in lore-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Local snapshot storage unavailable or full
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// No credential available for an authenticated call
    #[error("Authentication required - no stored credential")]
    AuthRequired,

    /// Malformed story draft or input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Transport failure (timeout, DNS, connection reset)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server rejected the request
    #[error("Remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Successful response that could not be used
    #[error("Unexpected response payload: {0}")]
    Payload(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
