//! HTTP Handlers

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;

use buddy_core::{
    Flashcard, context_hash,
    wire::{AccountSummary, CheckoutSessionHandle, Credentials, GenerateRequest, PublishableConfig},
};
use buddy_payments::{
    Account, CheckoutRequest, PaymentError, StripeClient, WebhookHandler, hash_password,
    verify_password,
};

use crate::auth::{CurrentAccount, login_cookie, logout_cookie};
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub ollama_connected: bool,
    pub stripe_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn insufficient_credits() -> ApiError {
    api_error(
        StatusCode::FORBIDDEN,
        PaymentError::InsufficientCredits.user_message(),
        "INSUFFICIENT_CREDITS",
    )
}

fn invalid_credentials() -> ApiError {
    api_error(
        StatusCode::UNAUTHORIZED,
        PaymentError::InvalidCredentials.user_message(),
        "INVALID_CREDENTIALS",
    )
}

fn account_error(context: &str, e: &PaymentError) -> ApiError {
    tracing::error!("{} error: {}", context, e);
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        e.user_message(),
        "ACCOUNT_ERROR",
    )
}

fn stripe_client(state: &AppState) -> Result<&StripeClient, ApiError> {
    state.stripe.as_deref().ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Payments not configured",
            "PAYMENTS_DISABLED",
        )
    })
}

/// Origin for redirect URLs: configured public URL, else the request's headers
fn request_origin(state: &AppState, headers: &HeaderMap) -> String {
    state
        .config
        .public_url
        .clone()
        .unwrap_or_else(|| origin_from_headers(headers))
}

/// `{scheme}://{host}`, honoring `X-Forwarded-Proto` from a TLS-terminating proxy
fn origin_from_headers(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| v == "http" || v == "https")
        .unwrap_or_else(|| "http".into());
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost:3000");
    format!("{scheme}://{host}")
}

/// Run Argon2 work off the async workers
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!("Password task failed: {}", e);
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An error occurred processing your request.",
            "ACCOUNT_ERROR",
        )
    })
}

fn summary(account: Account) -> AccountSummary {
    AccountSummary {
        username: account.username,
        credits: account.credits,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ollama_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        ollama_connected,
        stripe_configured: state.stripe.is_some(),
    })
}

/// Turn notes into flashcards, charging one credit for fresh generations
pub async fn generate_flashcards(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<Vec<Flashcard>>, ApiError> {
    if !account.has_credits() {
        return Err(insufficient_credits());
    }

    let text = payload.text.trim();
    if text.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Text cannot be empty",
            "EMPTY_TEXT",
        ));
    }

    let hash = context_hash(text);
    match state.cache.get(&hash).await {
        Ok(Some(cards)) => {
            tracing::info!(account_id = %account.id, hash = %hash, "Serving cached flashcards");
            return Ok(Json(cards));
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("Flashcard cache read failed: {}", e),
    }

    let cards = match state.generator.generate(text).await {
        Ok(cards) => cards,
        Err(e) => {
            tracing::error!("Error in AI query: {}", e);
            Vec::new()
        }
    };
    if cards.is_empty() {
        return Err(api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate flashcards from AI model",
            "GENERATION_FAILED",
        ));
    }

    // Another request may have spent the last credit while the model ran.
    let remaining = match state.accounts.try_spend(&account.id).await {
        Ok(remaining) => remaining,
        Err(PaymentError::InsufficientCredits) => return Err(insufficient_credits()),
        Err(e) => {
            tracing::error!("Transaction error: {}", e);
            return Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "A database error occurred during transaction.",
                "TRANSACTION_ERROR",
            ));
        }
    };

    if let Err(e) = state.cache.put(&hash, &cards).await {
        tracing::warn!("Flashcard cache write failed: {}", e);
    }

    tracing::info!(
        account_id = %account.id,
        cards = cards.len(),
        remaining,
        "Generated flashcards"
    );
    Ok(Json(cards))
}

/// Publishable key for Stripe.js
pub async fn get_config(
    State(state): State<AppState>,
    CurrentAccount(_account): CurrentAccount,
) -> Result<Json<PublishableConfig>, ApiError> {
    let stripe = stripe_client(&state)?;

    Ok(Json(PublishableConfig {
        publishable_key: stripe.publishable_key().to_string(),
    }))
}

/// Create a Stripe checkout session for the standard credit pack
pub async fn create_checkout_session(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    headers: HeaderMap,
) -> Result<Json<CheckoutSessionHandle>, ApiError> {
    let stripe = stripe_client(&state)?;
    let origin = request_origin(&state, &headers);

    let session = stripe
        .create_checkout_session(CheckoutRequest::standard(account.id, &origin))
        .await
        .map_err(|e| {
            tracing::error!("Checkout error: {}", e);
            api_error(StatusCode::FORBIDDEN, e.to_string(), "CHECKOUT_ERROR")
        })?;

    Ok(Json(CheckoutSessionHandle {
        session_id: session.id,
    }))
}

/// Stripe webhook handler
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<StatusCode, ApiError> {
    let stripe = stripe_client(&state)?;

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let handler = WebhookHandler::new(state.accounts.clone());

    let event = handler
        .parse_event(&body, signature, stripe.webhook_secret())
        .map_err(|e| match e {
            PaymentError::WebhookParse(_) => {
                tracing::warn!("Webhook payload rejected: {}", e);
                api_error(StatusCode::BAD_REQUEST, "Invalid payload", "INVALID_PAYLOAD")
            }
            _ => {
                tracing::warn!("Webhook signature failed: {}", e);
                api_error(StatusCode::BAD_REQUEST, "Invalid signature", "INVALID_SIGNATURE")
            }
        })?;

    handler.handle(&event).await.map_err(|e| {
        tracing::error!("Webhook processing error: {}", e);
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Webhook processing failed",
            "WEBHOOK_ERROR",
        )
    })?;

    Ok(StatusCode::OK)
}

/// Create a password account and log the browser in
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError> {
    let username = payload.username.trim().to_string();
    if username.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Username cannot be empty",
            "EMPTY_USERNAME",
        ));
    }
    if payload.password.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Password cannot be empty",
            "EMPTY_PASSWORD",
        ));
    }

    let password = payload.password;
    let password_hash = blocking(move || hash_password(&password))
        .await?
        .map_err(|e| account_error("Password hashing", &e))?;

    let account = state
        .accounts
        .create(&username, &password_hash, state.config.starting_credits)
        .await
        .map_err(|e| match e {
            PaymentError::UsernameTaken(_) => {
                api_error(StatusCode::CONFLICT, e.user_message(), "USERNAME_TAKEN")
            }
            _ => account_error("Registration", &e),
        })?;

    tracing::info!(account_id = %account.id, username = %account.username, "Registered account");

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, login_cookie(&account.key))],
        Json(summary(account)),
    ))
}

/// Log in with username and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .accounts
        .get_by_username(payload.username.trim())
        .await
        .map_err(|e| account_error("Login", &e))?
        .ok_or_else(invalid_credentials)?;

    let password = payload.password;
    let stored_hash = account.password_hash.clone();
    if !blocking(move || verify_password(&password, &stored_hash)).await? {
        tracing::info!(username = %account.username, "Rejected login");
        return Err(invalid_credentials());
    }

    Ok((
        [(header::SET_COOKIE, login_cookie(&account.key))],
        Json(summary(account)),
    ))
}

/// Clear the account cookie
pub async fn logout() -> impl IntoResponse {
    ([(header::SET_COOKIE, logout_cookie())], StatusCode::NO_CONTENT)
}

/// Current account and authoritative credit balance
pub async fn me(CurrentAccount(account): CurrentAccount) -> Json<AccountSummary> {
    Json(summary(account))
}
