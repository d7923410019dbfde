//! Transport seams
//!
//! Futures here are `!Send`: in the browser they run on the single-threaded
//! event loop.

use async_trait::async_trait;
use buddy_core::{
    Flashcard,
    wire::{CheckoutSessionHandle, PublishableConfig},
};

use crate::error::Result;

/// Flashcard generation endpoint
#[async_trait(?Send)]
pub trait FlashcardApi {
    /// `POST /generate-flashcards` with already-trimmed notes
    async fn generate(&self, text: &str) -> Result<Vec<Flashcard>>;
}

/// Payment capability: server endpoints plus the hosted checkout SDK
#[async_trait(?Send)]
pub trait PaymentClient {
    /// `GET /config`
    async fn publishable_config(&self) -> Result<PublishableConfig>;

    /// `POST /create-checkout-session`
    async fn create_session(&self) -> Result<CheckoutSessionHandle>;

    /// Initialize the SDK with `publishable_key` and leave for hosted checkout.
    ///
    /// Only returns on failure in practice; `Ok` means the browser is navigating.
    async fn redirect_to_checkout(&self, publishable_key: &str, session_id: &str) -> Result<()>;
}
