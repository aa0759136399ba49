//! Model listing handler

use axum::{extract::State, Json};
use serde_json::json;

use crate::AppState;

/// List the registered model names
pub async fn list(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "models": state.registry.model_names() }))
}
