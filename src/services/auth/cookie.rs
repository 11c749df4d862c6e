//! Session cookie encoding.
use axum::http::{HeaderMap, HeaderValue, header};
use chrono::{DateTime, Utc};

pub const SESSION_COOKIE_NAME: &str = "auth_cookie";

/// `Set-Cookie` value for a freshly minted session.
///
/// Always `Path=/`, `HttpOnly` and `Secure`; `Expires` matches the stored session expiry.
pub fn session_cookie(token: &str, expires_at: DateTime<Utc>) -> Option<HeaderValue> {
    let value = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; Expires={}; HttpOnly; Secure",
        expires_at.format("%a, %d %b %Y %H:%M:%S GMT")
    );
    HeaderValue::from_str(&value).ok()
}

/// Value of the session cookie carried by the request, if any.
///
/// Scans every `Cookie` header; an empty value counts as absent.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}
