//! Client Error Types

use buddy_core::wire::ErrorBody;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures of a browser flow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Non-2xx response carrying an `error` field
    #[error("{0}")]
    Server(String),

    /// Non-2xx response without a usable `error` field
    #[error("HTTP error! Status: {0}")]
    Status(u16),

    /// Request never completed
    #[error("{0}")]
    Network(String),

    /// 2xx response whose body did not match the expected shape
    #[error("{0}")]
    Decode(String),

    /// Error object reported by the hosted checkout redirect
    #[error("{0}")]
    Redirect(String),

    /// Payment SDK missing or threw
    #[error("Payment SDK error: {0}")]
    Sdk(String),
}

impl ClientError {
    /// Build the error for a non-2xx response from its status and raw body
    pub fn from_response(status: u16, body: &str) -> Self {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|msg| !msg.is_empty())
            .map_or(Self::Status(status), Self::Server)
    }

    /// Errors the user sees in a blocking alert
    pub const fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }
}
