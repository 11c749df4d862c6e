use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use super::AuthCtx;

/// Hands the resolved `AuthCtx` to a handler.
///
/// Only valid behind the identity middleware; without it there is no context and the
/// request is rejected with 500 (a wiring bug, not a caller problem).
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .map(AuthCtxExtractor)
            .ok_or_else(|| {
                tracing::error!("AuthCtx missing: route is not behind the identity middleware");
                StatusCode::INTERNAL_SERVER_ERROR
            })
    }
}
