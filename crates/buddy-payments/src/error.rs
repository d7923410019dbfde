//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment and account errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Stripe API error
    #[error("Stripe error: {0}")]
    Stripe(String),

    /// Webhook signature verification failed
    #[error("Webhook signature invalid: {0}")]
    WebhookSignature(String),

    /// Webhook payload parsing failed
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// Account not found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Username already registered
    #[error("Username taken: {0}")]
    UsernameTaken(String),

    /// Unknown username or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Password could not be hashed
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Not enough credits for the requested operation
    #[error("Insufficient credits")]
    InsufficientCredits,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PaymentError {
    /// Get user-friendly message
    pub const fn user_message(&self) -> &str {
        match self {
            Self::Stripe(_) => "Payment processing failed. Please try again.",
            Self::AccountNotFound(_) => "Account not found.",
            Self::UsernameTaken(_) => "Username already exists.",
            Self::InvalidCredentials => "Invalid username or password.",
            Self::InsufficientCredits => "Insufficient credits. Please purchase more.",
            Self::Config(_) => "Service configuration error.",
            _ => "An error occurred processing your request.",
        }
    }
}
