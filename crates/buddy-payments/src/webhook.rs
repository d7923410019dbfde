//! Stripe Webhook Handling
//!
//! Verifies the `Stripe-Signature` header and credits accounts when Stripe
//! reports a completed checkout. Only the fields this service reads are
//! decoded, so events from newer API versions still parse.

use std::collections::HashMap;
use std::sync::Arc;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::account::{AccountId, AccountStore};
use crate::checkout::CreditPack;
use crate::error::{PaymentError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a signed payload, in seconds
pub const SIGNATURE_TOLERANCE_SECS: u64 = 300;

const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// Parsed webhook event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookEvent {
    /// Checkout completed - add credits to the referenced account
    CheckoutCompleted {
        session_id: String,
        account_id: Option<AccountId>,
        credits: u32,
    },

    /// Unhandled event type
    Other { event_type: String },
}

#[derive(Deserialize)]
struct EventEnvelope {
    #[serde(rename = "type")]
    event_type: String,
    data: EventData,
}

#[derive(Deserialize)]
struct EventData {
    object: serde_json::Value,
}

#[derive(Deserialize)]
struct CompletedSession {
    id: String,
    #[serde(default)]
    client_reference_id: Option<String>,
    #[serde(default)]
    metadata: Option<HashMap<String, String>>,
}

fn signature_error(reason: &str) -> PaymentError {
    PaymentError::WebhookSignature(reason.to_string())
}

fn signed_mac(secret: &str, timestamp: i64, payload: &str) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| signature_error(&e.to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    Ok(mac)
}

/// Hex `v1` signature Stripe sends for `payload` signed at `timestamp`
pub fn compute_signature(secret: &str, timestamp: i64, payload: &str) -> Result<String> {
    let mac = signed_mac(secret, timestamp, payload)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a `t=...,v1=...` header against the payload at time `now`
pub fn verify_signature(payload: &str, header: &str, secret: &str, now: i64) -> Result<()> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| signature_error("missing timestamp"))?;
    if signatures.is_empty() {
        return Err(signature_error("missing v1 signature"));
    }
    if now.abs_diff(timestamp) > SIGNATURE_TOLERANCE_SECS {
        return Err(signature_error("timestamp outside tolerance"));
    }

    let mac = signed_mac(secret, timestamp, payload)?;
    let matched = signatures
        .iter()
        .filter_map(|sig| hex::decode(sig).ok())
        .any(|sig| mac.clone().verify_slice(&sig).is_ok());

    if matched {
        Ok(())
    } else {
        Err(signature_error("no matching signature"))
    }
}

/// Decode a verified payload into our event type
pub fn parse_payload(payload: &str) -> Result<WebhookEvent> {
    let envelope: EventEnvelope =
        serde_json::from_str(payload).map_err(|e| PaymentError::WebhookParse(e.to_string()))?;

    if envelope.event_type != CHECKOUT_COMPLETED {
        return Ok(WebhookEvent::Other {
            event_type: envelope.event_type,
        });
    }

    let session: CompletedSession = serde_json::from_value(envelope.data.object)
        .map_err(|e| PaymentError::WebhookParse(format!("Invalid checkout session data: {e}")))?;

    let credits = session
        .metadata
        .as_ref()
        .and_then(|m| m.get("credits"))
        .and_then(|c| c.parse().ok())
        .unwrap_or_else(|| CreditPack::standard().credits);

    Ok(WebhookEvent::CheckoutCompleted {
        session_id: session.id,
        account_id: session
            .client_reference_id
            .filter(|id| !id.is_empty())
            .map(AccountId::from_string),
        credits,
    })
}

/// Webhook handler
pub struct WebhookHandler<S: AccountStore + ?Sized> {
    accounts: Arc<S>,
}

impl<S: AccountStore + ?Sized> WebhookHandler<S> {
    pub const fn new(accounts: Arc<S>) -> Self {
        Self { accounts }
    }

    /// Verify webhook signature and parse event
    pub fn parse_event(&self, payload: &str, signature: &str, secret: &str) -> Result<WebhookEvent> {
        verify_signature(payload, signature, secret, chrono::Utc::now().timestamp())?;
        parse_payload(payload)
    }

    /// Apply a verified event to the account store.
    ///
    /// A completed checkout for an account this store does not know is
    /// acknowledged, so Stripe stops retrying it.
    pub async fn handle(&self, event: &WebhookEvent) -> Result<()> {
        match event {
            WebhookEvent::CheckoutCompleted {
                session_id,
                account_id: Some(account_id),
                credits,
            } => match self.accounts.add_credits(account_id, *credits).await {
                Ok(balance) => {
                    tracing::info!(
                        session_id = %session_id,
                        account_id = %account_id,
                        added = credits,
                        balance,
                        "Added credits after checkout"
                    );
                }
                Err(PaymentError::AccountNotFound(_)) => {
                    tracing::warn!(
                        session_id = %session_id,
                        account_id = %account_id,
                        "Checkout completed for unknown account"
                    );
                }
                Err(e) => return Err(e),
            },

            WebhookEvent::CheckoutCompleted {
                session_id,
                account_id: None,
                ..
            } => {
                tracing::warn!(
                    session_id = %session_id,
                    "Checkout completed without client_reference_id"
                );
            }

            WebhookEvent::Other { event_type } => {
                tracing::debug!(event_type = %event_type, "Unhandled webhook event");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MemoryAccountStore;

    const SECRET: &str = "whsec_test";
    const NOW: i64 = 1_700_000_000;

    fn header(payload: &str, timestamp: i64) -> String {
        format!(
            "t={timestamp},v1={}",
            compute_signature(SECRET, timestamp, payload).unwrap()
        )
    }

    fn completed(reference: &str) -> String {
        format!(
            r#"{{"id":"evt_1","type":"checkout.session.completed","data":{{"object":{{"id":"cs_test_1","object":"checkout.session","client_reference_id":"{reference}","metadata":{{"credits":"10"}}}}}}}}"#
        )
    }

    #[test]
    fn test_valid_signature_accepted() {
        let payload = completed("acct-1");
        verify_signature(&payload, &header(&payload, NOW), SECRET, NOW).unwrap();
    }

    #[test]
    fn test_any_matching_v1_is_enough() {
        let payload = completed("acct-1");
        let good = compute_signature(SECRET, NOW, &payload).unwrap();
        let header = format!("t={NOW},v1=00ff,v1={good},v0=abc");
        verify_signature(&payload, &header, SECRET, NOW).unwrap();
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let payload = completed("acct-1");
        let header = header(&payload, NOW);
        let err = verify_signature(&completed("acct-2"), &header, SECRET, NOW).unwrap_err();
        assert!(matches!(err, PaymentError::WebhookSignature(_)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = completed("acct-1");
        let err =
            verify_signature(&payload, &header(&payload, NOW), "whsec_other", NOW).unwrap_err();
        assert!(matches!(err, PaymentError::WebhookSignature(_)));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let payload = completed("acct-1");
        let signed_at = NOW - 301;
        let err =
            verify_signature(&payload, &header(&payload, signed_at), SECRET, NOW).unwrap_err();
        assert!(matches!(err, PaymentError::WebhookSignature(_)));
    }

    #[test]
    fn test_garbled_headers_rejected() {
        let payload = completed("acct-1");
        let overflow = format!("t={},v1=00", i64::MIN);
        for header in ["", "t=abc,v1=00", "v1=00", "t=1700000000", overflow.as_str()] {
            let err = verify_signature(&payload, header, SECRET, NOW).unwrap_err();
            assert!(matches!(err, PaymentError::WebhookSignature(_)), "{header}");
        }
    }

    #[test]
    fn test_parse_completed_checkout() {
        let event = parse_payload(&completed("acct-1")).unwrap();
        assert_eq!(
            event,
            WebhookEvent::CheckoutCompleted {
                session_id: "cs_test_1".into(),
                account_id: Some(AccountId::from_string("acct-1")),
                credits: 10,
            }
        );
    }

    #[test]
    fn test_parse_defaults_credits_without_metadata() {
        let payload = r#"{"type":"checkout.session.completed","data":{"object":{"id":"cs_1","client_reference_id":null,"metadata":null}}}"#;
        assert_eq!(
            parse_payload(payload).unwrap(),
            WebhookEvent::CheckoutCompleted {
                session_id: "cs_1".into(),
                account_id: None,
                credits: 10,
            }
        );
    }

    #[test]
    fn test_parse_other_event() {
        let payload = r#"{"type":"customer.created","data":{"object":{"id":"cus_1"}}}"#;
        assert_eq!(
            parse_payload(payload).unwrap(),
            WebhookEvent::Other {
                event_type: "customer.created".into()
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_payload() {
        for payload in ["not json", r#"{"type":"checkout.session.completed","data":{"object":{}}}"#] {
            assert!(matches!(
                parse_payload(payload).unwrap_err(),
                PaymentError::WebhookParse(_)
            ));
        }
    }

    #[tokio::test]
    async fn test_completed_checkout_adds_credits() {
        let store = Arc::new(MemoryAccountStore::new());
        let account = store.create("ada", "h", 0).await.unwrap();
        let handler = WebhookHandler::new(store.clone());

        handler
            .handle(&WebhookEvent::CheckoutCompleted {
                session_id: "cs_test_1".into(),
                account_id: Some(account.id.clone()),
                credits: 10,
            })
            .await
            .unwrap();

        assert_eq!(store.get(&account.id).await.unwrap().unwrap().credits, 10);
    }

    #[tokio::test]
    async fn test_completed_checkout_without_reference_is_ignored() {
        let handler = WebhookHandler::new(Arc::new(MemoryAccountStore::new()));

        handler
            .handle(&WebhookEvent::CheckoutCompleted {
                session_id: "cs_test_1".into(),
                account_id: None,
                credits: 10,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_account_is_acknowledged() {
        let handler = WebhookHandler::new(Arc::new(MemoryAccountStore::new()));

        handler
            .handle(&WebhookEvent::CheckoutCompleted {
                session_id: "cs_test_1".into(),
                account_id: Some(AccountId::from_string("missing")),
                credits: 10,
            })
            .await
            .unwrap();
    }
}
