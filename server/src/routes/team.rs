//! Protected `/api/v1/*` demo endpoints, served from the `[team]` config section.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// `GET /api/v1/description`
pub async fn description(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "description": state.config.team.description }))
}

/// `GET /api/v1/team`
pub async fn team(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "team": &state.config.team }))
}

/// `GET /api/v1/teamsize`
pub async fn team_size(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "size": state.config.team.members.len() }))
}

/// `GET /api/v1/images`
pub async fn images(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "images": &state.config.team.images }))
}
