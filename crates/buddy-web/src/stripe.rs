//! Stripe.js bridge
//!
//! The SDK is loaded by a `<script>` tag in `index.html`, so it is reached
//! through the global object at call time.

use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use buddy_client::{ClientError, Result};

fn sdk_error(value: &JsValue) -> ClientError {
    let message = value
        .as_string()
        .or_else(|| {
            Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| "unknown error".into());
    ClientError::Sdk(message)
}

fn method(target: &JsValue, name: &str) -> Result<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .map_err(|e| sdk_error(&e))?
        .dyn_into::<Function>()
        .map_err(|_| ClientError::Sdk(format!("{name} is not available")))
}

/// `Stripe(publishable_key).redirectToCheckout({ sessionId })`
///
/// A resolved `{ error }` becomes [`ClientError::Redirect`].
pub async fn redirect_to_checkout(publishable_key: &str, session_id: &str) -> Result<()> {
    let global: JsValue = js_sys::global().into();
    let stripe = method(&global, "Stripe")?
        .call1(&JsValue::NULL, &JsValue::from_str(publishable_key))
        .map_err(|e| sdk_error(&e))?;

    let options = Object::new();
    Reflect::set(
        &options,
        &JsValue::from_str("sessionId"),
        &JsValue::from_str(session_id),
    )
    .map_err(|e| sdk_error(&e))?;

    let promise: Promise = method(&stripe, "redirectToCheckout")?
        .call1(&stripe, &options)
        .map_err(|e| sdk_error(&e))?
        .dyn_into()
        .map_err(|_| ClientError::Sdk("redirectToCheckout did not return a promise".into()))?;

    let result = JsFuture::from(promise).await.map_err(|e| sdk_error(&e))?;

    let error = Reflect::get(&result, &JsValue::from_str("error")).unwrap_or(JsValue::UNDEFINED);
    if error.is_undefined() || error.is_null() {
        return Ok(());
    }

    let message = Reflect::get(&error, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| "Checkout redirect failed".into());
    Err(ClientError::Redirect(message))
}
