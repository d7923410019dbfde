//! Stripe Checkout Integration
//!
//! One-off payments for credit packs through Stripe's hosted checkout page.

use serde::{Deserialize, Serialize};
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData, CreateCheckoutSessionPaymentMethodTypes,
    Currency,
};

use crate::account::AccountId;
use crate::error::{PaymentError, Result};

/// Stripe client wrapper
pub struct StripeClient {
    client: Client,
    webhook_secret: String,
    publishable_key: String,
}

impl StripeClient {
    pub fn new(secret_key: &str, webhook_secret: &str, publishable_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
            webhook_secret: webhook_secret.to_string(),
            publishable_key: publishable_key.to_string(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| {
            std::env::var(name).map_err(|_| PaymentError::Config(format!("{name} not set")))
        };

        Ok(Self::new(
            &var("STRIPE_SECRET_KEY")?,
            &var("STRIPE_WEBHOOK_SECRET")?,
            &var("STRIPE_PUBLISHABLE_KEY")?,
        ))
    }

    pub fn webhook_secret(&self) -> &str {
        &self.webhook_secret
    }

    /// Key handed to Stripe.js in the browser
    pub fn publishable_key(&self) -> &str {
        &self.publishable_key
    }

    /// Create a hosted Checkout session for a credit pack
    pub async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<CheckoutSession> {
        let pack = &request.pack;

        let mut params = CreateCheckoutSession::new();
        params.success_url = Some(&request.success_url);
        params.cancel_url = Some(&request.cancel_url);
        params.mode = Some(CheckoutSessionMode::Payment);
        params.payment_method_types = Some(vec![CreateCheckoutSessionPaymentMethodTypes::Card]);
        params.client_reference_id = Some(request.account_id.as_str());

        let mut metadata = std::collections::HashMap::new();
        metadata.insert("credits".to_string(), pack.credits.to_string());
        params.metadata = Some(metadata);

        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            quantity: Some(1),
            price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                currency: Currency::USD,
                unit_amount: Some(pack.cents),
                product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: pack.name.clone(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]);

        let session = StripeCheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        tracing::info!(
            session_id = %session.id,
            account_id = %request.account_id,
            credits = pack.credits,
            "Created checkout session"
        );

        Ok(CheckoutSession {
            id: session.id.to_string(),
        })
    }
}

/// A purchasable bundle of credits
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditPack {
    /// Product name shown on the checkout page
    pub name: String,
    pub credits: u32,
    /// Price in US cents
    pub cents: i64,
}

impl CreditPack {
    /// 10 credits for $5.00
    pub fn standard() -> Self {
        Self {
            name: "10 AI Study Buddy Credits".into(),
            credits: 10,
            cents: 500,
        }
    }
}

impl Default for CreditPack {
    fn default() -> Self {
        Self::standard()
    }
}

/// Request to create a checkout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub pack: CreditPack,

    /// Account credited when the webhook reports completion
    pub account_id: AccountId,

    /// URL to redirect after successful payment
    pub success_url: String,

    /// URL to redirect if checkout is cancelled
    pub cancel_url: String,
}

impl CheckoutRequest {
    /// Standard pack with return URLs under `origin`
    pub fn standard(account_id: AccountId, origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            pack: CreditPack::standard(),
            account_id,
            success_url: format!("{origin}/study?session_id={{CHECKOUT_SESSION_ID}}"),
            cancel_url: format!("{origin}/study"),
        }
    }
}

/// Result of creating a checkout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Stripe session ID, handed to Stripe.js
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_pack() {
        let pack = CreditPack::standard();
        assert_eq!(pack.credits, 10);
        assert_eq!(pack.cents, 500);
        assert_eq!(pack.name, "10 AI Study Buddy Credits");
    }

    #[test]
    fn test_standard_request_urls() {
        let request = CheckoutRequest::standard(
            AccountId::from_string("acct-1"),
            "https://buddy.example/",
        );
        assert_eq!(
            request.success_url,
            "https://buddy.example/study?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(request.cancel_url, "https://buddy.example/study");
    }

    #[test]
    fn test_client_keeps_publishable_key() {
        let client = StripeClient::new("sk_test_x", "whsec_x", "pk_test_x");
        assert_eq!(client.publishable_key(), "pk_test_x");
        assert_eq!(client.webhook_secret(), "whsec_x");
    }
}
