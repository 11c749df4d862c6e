/*
 * Responsibility
 * - GET / and GET /whoami: echo the identity the gate resolved
 */
use axum::Json;
use serde::Serialize;

use crate::api::extractors::{AuthCtxExtractor, AuthMethod};

#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub username: String,
    pub method: AuthMethod,
}

pub async fn whoami(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<WhoamiResponse> {
    Json(WhoamiResponse {
        username: ctx.username,
        method: ctx.method,
    })
}
