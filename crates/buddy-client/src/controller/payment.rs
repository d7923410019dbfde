//! Payment Initiation Controller
//!
//! Config → checkout session → hosted checkout redirect. Failures are logged;
//! redirect errors reported by the SDK are also shown in an alert.

use std::cell::Cell;

use crate::api::PaymentClient;
use crate::error::Result;
use crate::view::Notifier;

/// How a buy-credits click ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The browser is leaving for hosted checkout
    Redirected,
    /// A previous click is still being processed
    Busy,
    Failed(String),
}

/// Drives one buy-credits button
pub struct PaymentController<P, N> {
    client: P,
    notifier: N,
    pending: Cell<bool>,
}

impl<P: PaymentClient, N: Notifier> PaymentController<P, N> {
    pub const fn new(client: P, notifier: N) -> Self {
        Self {
            client,
            notifier,
            pending: Cell::new(false),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Handle a click on the buy-credits trigger
    pub async fn start(&self) -> PaymentOutcome {
        // Rapid double clicks would otherwise create two checkout sessions
        if self.pending.replace(true) {
            return PaymentOutcome::Busy;
        }

        let outcome = match self.checkout().await {
            Ok(()) => PaymentOutcome::Redirected,
            Err(e) if e.is_redirect() => {
                tracing::error!(error = %e, "Stripe redirect error");
                self.notifier.alert(&e.to_string());
                PaymentOutcome::Failed(e.to_string())
            }
            Err(e) => {
                tracing::error!(error = %e, "Payment initiation error");
                PaymentOutcome::Failed(e.to_string())
            }
        };

        self.pending.set(false);
        outcome
    }

    async fn checkout(&self) -> Result<()> {
        let config = self.client.publishable_config().await?;
        let session = self.client.create_session().await?;
        tracing::info!(session_id = %session.session_id, "Redirecting to hosted checkout");
        self.client
            .redirect_to_checkout(&config.publishable_key, &session.session_id)
            .await
    }
}
