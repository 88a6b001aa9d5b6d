//! Key management endpoints — issue, list, delete.
//!
//! These paths are public: anyone can mint a key. That is the point of the
//! demo, not an oversight in the gate.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::AppState;

/// `POST /generate-key` — issue a new key.
///
/// The response is the only place the plaintext `apiKey` ever appears.
pub async fn generate_key(State(state): State<AppState>) -> Response {
    let store = state.key_store.clone();
    match tokio::task::spawn_blocking(move || store.create()).await {
        Ok(Ok(issued)) => Json(issued).into_response(),
        Ok(Err(e)) => {
            error!("Key creation failed: {e}");
            generation_failed()
        }
        Err(e) => {
            error!("Key creation task failed: {e}");
            generation_failed()
        }
    }
}

/// `GET /keys` — list issued keys in creation order, masked.
pub async fn list_keys(State(state): State<AppState>) -> Response {
    Json(json!({ "keys": state.key_store.list() })).into_response()
}

/// `DELETE /keys/{id}` — revoke a key.
///
/// Returns `404` with `{"error": "Key not found"}` for unknown ids.
pub async fn delete_key(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if state.key_store.delete(&id) {
        Json(json!({ "success": true })).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Key not found" })),
        )
            .into_response()
    }
}

fn generation_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Failed to generate API key" })),
    )
        .into_response()
}
