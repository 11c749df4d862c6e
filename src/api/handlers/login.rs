/*
 * Responsibility
 * - GET|POST /login
 * - identity provider -> new session -> Set-Cookie -> 302 to the sanitized returnURL
 * - Never answers 200: either a redirect or an opaque 500
 */
use axum::{
    body::{Body, Bytes, to_bytes},
    extract::State,
    http::{HeaderMap, Method, Request, header, request::Parts},
    response::Response,
};
use tracing::{debug, info};

use crate::api::response::found;
use crate::error::AppError;
use crate::middleware::http::BODY_LIMIT_BYTES;
use crate::services::auth::redirect::{DEFAULT_DESTINATION, redirect_destination};
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    req: Request<Body>,
) -> Result<Response, AppError> {
    let (parts, body) = req.into_parts();

    // An unreadable body counts as an unparseable form: default destination.
    let form_body = match read_form_body(&parts, body).await {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            debug!(error = %err, "cannot read login form body");
            None
        }
    };

    let issued = state
        .login
        .login(&parts, form_body.as_deref().unwrap_or_default())
        .await?;

    let destination = match form_body.as_deref() {
        Some(body) => redirect_destination(&parts.method, parts.uri.query(), Some(body)),
        None => DEFAULT_DESTINATION.to_string(),
    };

    info!(username = %issued.username, destination = %destination, "login succeeded");

    let mut resp = found(&destination);
    resp.headers_mut().insert(header::SET_COOKIE, issued.cookie);
    Ok(resp)
}

async fn read_form_body(parts: &Parts, body: Body) -> Result<Bytes, axum::Error> {
    if parts.method != Method::POST || !is_urlencoded_form(&parts.headers) {
        return Ok(Bytes::new());
    }
    to_bytes(body, BODY_LIMIT_BYTES).await
}

fn is_urlencoded_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|v| {
            v.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}
