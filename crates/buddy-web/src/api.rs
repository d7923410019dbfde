//! API Client
//!
//! `reqwest` (fetch-backed on WASM) implementations of the controller
//! transports, plus the account calls used by the pages.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use buddy_client::{ClientError, FlashcardApi, PaymentClient, Result};
use buddy_core::{
    Flashcard,
    wire::{AccountSummary, CheckoutSessionHandle, Credentials, GenerateRequest, PublishableConfig},
};

use crate::stripe;

/// Absolute URL for a same-origin path
fn endpoint(path: &str) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into());
    format!("{origin}{path}")
}

/// Decode a 2xx body, or turn a non-2xx into the matching `ClientError`
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;

    if !status.is_success() {
        return Err(ClientError::from_response(status.as_u16(), &body));
    }
    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let response = reqwest::Client::new()
        .get(endpoint(path))
        .send()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;
    read_json(response).await
}

async fn post_json<B: Serialize, T: DeserializeOwned>(
    path: &str,
    body: Option<&B>,
) -> Result<T> {
    let mut request = reqwest::Client::new().post(endpoint(path));
    if let Some(body) = body {
        request = request.json(body);
    }
    let response = request
        .send()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;
    read_json(response).await
}

/// `POST /generate-flashcards`
#[derive(Clone, Copy, Default)]
pub struct HttpFlashcardApi;

#[async_trait(?Send)]
impl FlashcardApi for HttpFlashcardApi {
    async fn generate(&self, text: &str) -> Result<Vec<Flashcard>> {
        let body = GenerateRequest { text: text.into() };
        post_json("/generate-flashcards", Some(&body)).await
    }
}

/// Server endpoints plus the global Stripe.js object
#[derive(Clone, Copy, Default)]
pub struct HttpPaymentClient;

#[async_trait(?Send)]
impl PaymentClient for HttpPaymentClient {
    async fn publishable_config(&self) -> Result<PublishableConfig> {
        get_json("/config").await
    }

    async fn create_session(&self) -> Result<CheckoutSessionHandle> {
        post_json::<(), _>("/create-checkout-session", None).await
    }

    async fn redirect_to_checkout(&self, publishable_key: &str, session_id: &str) -> Result<()> {
        stripe::redirect_to_checkout(publishable_key, session_id).await
    }
}

/// Authoritative account summary for seeding the credit display
pub async fn fetch_account() -> Result<AccountSummary> {
    get_json("/me").await
}

pub async fn register(username: &str, password: &str) -> Result<AccountSummary> {
    let body = Credentials {
        username: username.into(),
        password: password.into(),
    };
    post_json("/register", Some(&body)).await
}

pub async fn login(username: &str, password: &str) -> Result<AccountSummary> {
    let body = Credentials {
        username: username.into(),
        password: password.into(),
    };
    post_json("/login", Some(&body)).await
}

pub async fn logout() -> Result<()> {
    let response = reqwest::Client::new()
        .post(endpoint("/logout"))
        .send()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(ClientError::Status(response.status().as_u16()))
    }
}
