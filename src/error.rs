/*
 * Responsibility
 * - HTTP-facing error type (AppError) and its IntoResponse
 * - Internal faults become an opaque 500: the body never carries the cause
 * - Authentication gaps are not errors here; they are redirects (see middleware::auth)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::LoginError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match self {
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<LoginError> for AppError {
    fn from(e: LoginError) -> Self {
        // Already logged with detail where it happened.
        match e {
            LoginError::IdentityExtraction(_)
            | LoginError::NullIdentity
            | LoginError::RandomSource(_)
            | LoginError::InvalidCookie => AppError::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;
    use crate::services::auth::IdentityError;

    #[tokio::test]
    async fn internal_error_body_is_opaque() {
        let err: AppError =
            LoginError::IdentityExtraction(IdentityError::Provider("secret detail".into())).into();
        let resp = err.into_response();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("secret detail"));
        assert!(body.contains("INTERNAL_SERVER_ERROR"));
    }
}
