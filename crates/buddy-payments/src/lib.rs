//! # buddy-payments
//!
//! Credit purchases, password accounts and balances for Study Buddy.
//!
//! ## Flow
//!
//! Stripe Checkout (hosted): the browser never sees card details.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌─────────────┐
//! │  Study page │────▶│  Stripe Hosted  │────▶│  Study page │
//! │ (buy)       │     │  Checkout Page  │     │ (success)   │
//! └─────────────┘     └─────────────────┘     └─────────────┘
//!                              │
//!                              ▼  checkout.session.completed
//!                     ┌─────────────────┐
//!                     │  /stripe-webhook │──▶ +10 credits
//!                     └─────────────────┘
//! ```
//!
//! The session carries the account id as `client_reference_id`; the webhook
//! uses it to find the account to credit.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use buddy_payments::{CheckoutRequest, StripeClient};
//!
//! let client = StripeClient::new("sk_test_xxx", "whsec_xxx", "pk_test_xxx");
//! let session = client
//!     .create_checkout_session(CheckoutRequest::standard(account.id, "https://yoursite.com"))
//!     .await?;
//!
//! // Hand session.id to Stripe.js redirectToCheckout
//! ```

mod account;
mod checkout;
mod error;
mod password;
mod webhook;

pub use account::{Account, AccountId, AccountKey, AccountStore, MemoryAccountStore};
pub use checkout::{CheckoutRequest, CheckoutSession, CreditPack, StripeClient};
pub use error::{PaymentError, Result};
pub use password::{hash_password, verify_password};
pub use webhook::{
    SIGNATURE_TOLERANCE_SECS, WebhookEvent, WebhookHandler, compute_signature, parse_payload,
    verify_signature,
};
