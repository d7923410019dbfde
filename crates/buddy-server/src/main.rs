//! Study Buddy HTTP Server
//!
//! Axum-based server for flashcard generation, credit purchases and the
//! static WASM frontend.

mod auth;
mod config;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use buddy_core::{
    FlashcardCache, FlashcardGenerator, GeneratorConfig, LlmProvider, MemoryFlashcardCache,
};
use buddy_payments::{AccountStore, MemoryAccountStore, StripeClient};
use buddy_runtime::OllamaProvider;
use buddy_storage::SqliteStore;

use crate::config::ServerConfig;
use crate::handlers::{
    create_checkout_session, generate_flashcards, get_config, health_check, login, logout, me,
    register, stripe_webhook,
};
use crate::state::AppState;

/// Build the application router
fn router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    let spa = ServeDir::new(&static_dir).fallback(ServeFile::new(format!("{static_dir}/index.html")));

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health_check))
        // Accounts
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        // Flashcards
        .route("/generate-flashcards", post(generate_flashcards))
        // Payments
        .route("/config", get(get_config))
        .route("/create-checkout-session", post(create_checkout_session))
        .route("/stripe-webhook", post(stripe_webhook))
        // Static files (WASM frontend)
        .fallback_service(spa)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    // Initialize LLM provider
    let provider: Arc<dyn LlmProvider> = Arc::new(OllamaProvider::from_env());

    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to Ollama");
            if let Ok(models) = provider.list_models().await {
                for model in models {
                    tracing::info!("  Model: {}", model.id);
                }
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Ollama not available - flashcard generation will fail");
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    let generator = FlashcardGenerator::new(
        provider.clone(),
        GeneratorConfig::with_model(config.model.clone()),
    );
    tracing::info!(model = %config.model, "Flashcard generator ready");

    // Initialize payments
    let stripe = match StripeClient::from_env() {
        Ok(client) => {
            tracing::info!("✓ Stripe configured");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!("⚠ Stripe not configured - payments disabled ({})", e);
            tracing::warn!(
                "  Set STRIPE_SECRET_KEY, STRIPE_WEBHOOK_SECRET and STRIPE_PUBLISHABLE_KEY in .env"
            );
            None
        }
    };

    // Initialize storage
    let (accounts, cache): (Arc<dyn AccountStore>, Arc<dyn FlashcardCache>) =
        if let Some(url) = &config.database_url {
            let store = SqliteStore::open(url).await?;
            tracing::info!("✓ Accounts and decks persisted to SQLite");
            (Arc::new(store.clone()), Arc::new(store))
        } else {
            tracing::warn!("⚠ DATABASE_URL not set - accounts and decks live in memory only");
            (
                Arc::new(MemoryAccountStore::new()),
                Arc::new(MemoryFlashcardCache::new()),
            )
        };

    let bind_addr = config.bind_addr.clone();

    // Build application state
    let state = AppState {
        provider,
        generator: Arc::new(generator),
        accounts,
        cache,
        stripe,
        config: Arc::new(config),
    };

    let app = router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("📚 Study Buddy running on http://{}", bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                  - Health check");
    tracing::info!("  POST /register | /login       - Account cookie");
    tracing::info!("  GET  /me                      - Credit balance");
    tracing::info!("  POST /generate-flashcards     - Notes → flashcards (1 credit)");
    tracing::info!("  GET  /config                  - Stripe publishable key");
    tracing::info!("  POST /create-checkout-session - Buy 10 credits");
    tracing::info!("  POST /stripe-webhook          - Stripe events");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
