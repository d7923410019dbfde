//! JSON bodies shared by the server handlers and the browser client.

use serde::{Deserialize, Serialize};

/// `POST /generate-flashcards` body
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub text: String,
}

/// Error body returned with any non-2xx status
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /config` response
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishableConfig {
    pub publishable_key: String,
}

/// `POST /create-checkout-session` response
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionHandle {
    pub session_id: String,
}

/// `POST /register` and `POST /login` body
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `GET /me`, `POST /register` and `POST /login` response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountSummary {
    pub username: String,
    pub credits: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_fields() {
        let config = PublishableConfig {
            publishable_key: "pk_test_1".into(),
        };
        assert_eq!(
            serde_json::to_string(&config).unwrap(),
            r#"{"publishableKey":"pk_test_1"}"#
        );

        let handle: CheckoutSessionHandle =
            serde_json::from_str(r#"{"sessionId":"cs_test_1"}"#).unwrap();
        assert_eq!(handle.session_id, "cs_test_1");
    }

    #[test]
    fn test_error_body_field_is_optional() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.error.is_none());

        let body: ErrorBody = serde_json::from_str(r#"{"error":"nope","code":"X"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("nope"));
    }

    #[test]
    fn test_credentials_missing_fields_default_to_empty() {
        let creds: Credentials = serde_json::from_str(r#"{"username":"ada"}"#).unwrap();
        assert_eq!(creds.username, "ada");
        assert!(creds.password.is_empty());
    }
}
