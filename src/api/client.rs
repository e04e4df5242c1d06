//! Browser fetch client.
//!
//! All requests go to `BACKEND_URL` (a global set on `window`, empty
//! for same-origin) with cookies included. Result saves are
//! fire-and-forget: a failed save is logged and the round finishes
//! normally.

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCredentials, RequestInit, Response};

use super::GameResult;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http status {0}")]
    Http(u16),
    #[error("network request failed")]
    Network,
    #[error("malformed response body")]
    Decode,
}

/// Backend base URL from the `BACKEND_URL` window global. Empty means
/// same-origin.
pub fn backend_url() -> String {
    web_sys::window()
        .and_then(|w| js_sys::Reflect::get(&w, &JsValue::from_str("BACKEND_URL")).ok())
        .and_then(|v| v.as_string())
        .unwrap_or_default()
}

async fn fetch_text(method: &str, path: &str, body: Option<String>) -> Result<String, ApiError> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_credentials(RequestCredentials::Include);
    if let Some(body) = body {
        opts.set_body(&JsValue::from_str(&body));
    }

    let url = format!("{}{}", backend_url(), path);
    let request = Request::new_with_str_and_init(&url, &opts).map_err(|_| ApiError::Network)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|_| ApiError::Network)?;

    let window = web_sys::window().ok_or(ApiError::Network)?;
    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| ApiError::Network)?;
    let response: Response = response.dyn_into().map_err(|_| ApiError::Network)?;

    if !response.ok() {
        return Err(ApiError::Http(response.status()));
    }

    let text = JsFuture::from(response.text().map_err(|_| ApiError::Decode)?)
        .await
        .map_err(|_| ApiError::Decode)?;
    text.as_string().ok_or(ApiError::Decode)
}

pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    let text = fetch_text("GET", path, None).await?;
    serde_json::from_str(&text).map_err(|_| ApiError::Decode)
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(
    path: &str,
    body: &B,
) -> Result<T, ApiError> {
    let body = serde_json::to_string(body).map_err(|_| ApiError::Decode)?;
    let text = fetch_text("POST", path, Some(body)).await?;
    serde_json::from_str(&text).map_err(|_| ApiError::Decode)
}

/// POST with no body and no interesting response, e.g. logout.
pub async fn post_empty(path: &str) -> Result<(), ApiError> {
    fetch_text("POST", path, None).await.map(|_| ())
}

/// Fire-and-forget result save. Completion of the round never waits on
/// the network; a failure is logged and swallowed.
pub fn report(result: GameResult) {
    wasm_bindgen_futures::spawn_local(async move {
        let path = result.save_path();
        match post_json::<_, serde_json::Value>(path, &result).await {
            Ok(_) => log::info!("result saved to {path}"),
            Err(err) => warn!("failed to save result to {path}: {err}"),
        }
    });
}
