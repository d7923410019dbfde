//! Error Types

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, BuddyError>;

/// Core error types
#[derive(Error, Debug)]
pub enum BuddyError {
    /// LLM provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Cache backend failure
    #[error("Cache error: {0}")]
    Cache(String),
}
