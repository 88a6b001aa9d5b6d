//! Per-request API key gate.
//!
//! Key management paths (`/generate-key`, `/keys`, `/keys/*`) are public.
//! Every other path, including ones no route matches, needs an `x-api-key`
//! header whose value validates against the [`KeyStore`](crate::keys::KeyStore).

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::AppState;

/// Header carrying the plaintext credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Whether `path` bypasses credential validation.
pub fn is_public_path(path: &str) -> bool {
    path == "/generate-key" || path == "/keys" || path.starts_with("/keys/")
}

/// Axum middleware enforcing the gate.
///
/// # Error responses
///
/// - `401 Unauthorized` — header missing, not valid UTF-8, or not a known key
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_public_path(request.uri().path()) {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    // Argon2 verification is CPU-bound; keep it off the async workers.
    let store = state.key_store.clone();
    let valid = match tokio::task::spawn_blocking(move || store.validate(provided.as_deref()))
        .await
    {
        Ok(valid) => valid,
        Err(e) => {
            error!("API key validation task failed: {e}");
            false
        }
    };

    if !valid {
        warn!(path = %request.uri().path(), "Rejected request: invalid or missing API key");
        return unauthorized();
    }

    next.run(request).await
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Invalid or missing API key"})),
    )
        .into_response()
}
