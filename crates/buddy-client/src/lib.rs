//! # buddy-client
//!
//! The two browser flows of Study Buddy, written against small traits so they
//! run the same in the WASM frontend and in native tests.
//!
//! ```text
//!  click ──▶ FlashcardController ──▶ FlashcardApi ──▶ POST /generate-flashcards
//!                   │
//!                   └──▶ FlashcardView (loading, cards, status, credits)
//!
//!  click ──▶ PaymentController ──▶ PaymentClient ──▶ GET /config
//!                   │                             ──▶ POST /create-checkout-session
//!                   │                             ──▶ hosted checkout redirect
//!                   └──▶ Notifier (alert)
//! ```

pub mod api;
pub mod controller;
pub mod error;
pub mod view;

pub use api::{FlashcardApi, PaymentClient};
pub use controller::{
    FlashcardController, GenerateOutcome, PaymentController, PaymentOutcome, parse_credits,
};
pub use error::{ClientError, Result};
pub use view::{CardFace, FlashcardView, Notifier};
