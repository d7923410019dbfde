//! Application State

use std::sync::Arc;

use buddy_core::{FlashcardCache, FlashcardGenerator, LlmProvider};
use buddy_payments::{AccountStore, StripeClient};

use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// LLM provider (Ollama, etc.), kept for health checks
    pub provider: Arc<dyn LlmProvider>,

    /// Notes → flashcards
    pub generator: Arc<FlashcardGenerator>,

    /// Accounts and credit balances
    pub accounts: Arc<dyn AccountStore>,

    /// Generated decks keyed by notes hash
    pub cache: Arc<dyn FlashcardCache>,

    /// Stripe client (optional - None if not configured)
    pub stripe: Option<Arc<StripeClient>>,

    pub config: Arc<ServerConfig>,
}
