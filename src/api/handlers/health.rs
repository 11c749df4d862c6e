/*
 * Responsibility
 * - GET /health on the status listener (plain HTTP, never behind the identity gate)
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "sessions": state.sessions.len(),
        })),
    )
}
