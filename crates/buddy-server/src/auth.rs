//! Account cookie handling

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
};

use buddy_payments::{Account, AccountKey};

use crate::handlers::{ApiError, ErrorResponse};
use crate::state::AppState;

pub const ACCOUNT_COOKIE: &str = "buddy_account";

/// `Set-Cookie` value that logs the browser in
pub fn login_cookie(key: &AccountKey) -> String {
    format!("{ACCOUNT_COOKIE}={key}; HttpOnly; SameSite=Lax; Path=/")
}

/// `Set-Cookie` value that logs the browser out
pub fn logout_cookie() -> String {
    format!("{ACCOUNT_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

/// Account key from the `Cookie` header, if present
pub fn account_key_from_headers(headers: &HeaderMap) -> Option<AccountKey> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == ACCOUNT_COOKIE && !value.is_empty())
        .map(|(_, value)| AccountKey::from_string(value))
}

/// Logged-in account, required by the flashcard and payment endpoints
pub struct CurrentAccount(pub Account);

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let unauthorized = || {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Please log in first.".into(),
                    code: "NOT_LOGGED_IN".into(),
                }),
            )
        };

        let key = account_key_from_headers(&parts.headers).ok_or_else(unauthorized)?;

        match state.accounts.get_by_key(&key).await {
            Ok(Some(account)) => Ok(Self(account)),
            Ok(None) => Err(unauthorized()),
            Err(e) => {
                tracing::error!("Account lookup error: {}", e);
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: e.user_message().into(),
                        code: "ACCOUNT_ERROR".into(),
                    }),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; buddy_account=abcd-1234-ef56-7890; lang=en"),
        );

        let key = account_key_from_headers(&headers).unwrap();
        assert_eq!(key.as_str(), "ABCD-1234-EF56-7890");
    }

    #[test]
    fn test_missing_or_empty_cookie() {
        let mut headers = HeaderMap::new();
        assert!(account_key_from_headers(&headers).is_none());

        headers.insert(header::COOKIE, HeaderValue::from_static("buddy_account="));
        assert!(account_key_from_headers(&headers).is_none());
    }

    #[test]
    fn test_cookie_strings() {
        let key = AccountKey::from_string("ABCD-1234-EF56-7890");
        assert_eq!(
            login_cookie(&key),
            "buddy_account=ABCD-1234-EF56-7890; HttpOnly; SameSite=Lax; Path=/"
        );
        assert!(logout_cookie().contains("Max-Age=0"));
    }
}
