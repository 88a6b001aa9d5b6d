//! Protected greeting used to exercise the API key gate.

use axum::Json;
use serde_json::{json, Value};

/// `GET /hello`
pub async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello from the hashed in-memory API!" }))
}
