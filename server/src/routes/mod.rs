//! HTTP route handlers and router assembly.
//!
//! Each sub-module corresponds to an endpoint group. [`router`] wires them
//! behind the [`crate::auth::require_api_key`] gate, which lets the key
//! management paths through and checks `x-api-key` on everything else.

pub mod hello;
pub mod keys;
pub mod team;

use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth, AppState};

/// Build the full application router.
///
/// The fallback is registered before the gate layer so unknown paths are
/// gated too: without a key they get `401`, with one they get `404`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate-key", post(keys::generate_key))
        .route("/keys", get(keys::list_keys))
        .route("/keys/{id}", delete(keys::delete_key))
        .route("/hello", get(hello::hello))
        .route("/api/v1/description", get(team::description))
        .route("/api/v1/team", get(team::team))
        .route("/api/v1/teamsize", get(team::team_size))
        .route("/api/v1/images", get(team::images))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
