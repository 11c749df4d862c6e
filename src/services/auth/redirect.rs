//! Post-login destination handling.
//!
//! The only open-redirect defense in the gateway: a caller supplied `returnURL`
//! is honoured only when it is a same-origin absolute path.

use axum::http::Method;
use thiserror::Error;

pub const RETURN_URL_PARAM: &str = "returnURL";
pub const DEFAULT_DESTINATION: &str = "/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("malformed percent escape in form")]
    BadEscape,
    #[error("form body is not valid UTF-8")]
    NotUtf8,
}

/// Parse a request form: body pairs first (POST only), then query pairs.
///
/// Malformed percent escapes fail the whole form instead of being passed through.
pub fn parse_form(
    method: &Method,
    query: Option<&str>,
    body: Option<&[u8]>,
) -> Result<Vec<(String, String)>, FormError> {
    let mut pairs = Vec::new();

    if *method == Method::POST
        && let Some(body) = body
    {
        let body = std::str::from_utf8(body).map_err(|_| FormError::NotUtf8)?;
        pairs.extend(parse_urlencoded(body)?);
    }
    if let Some(query) = query {
        pairs.extend(parse_urlencoded(query)?);
    }

    Ok(pairs)
}

fn parse_urlencoded(raw: &str) -> Result<Vec<(String, String)>, FormError> {
    if !escapes_are_well_formed(raw) {
        return Err(FormError::BadEscape);
    }

    Ok(url::form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect())
}

fn escapes_are_well_formed(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3);
            match hex {
                Some(h) if h.iter().all(u8::is_ascii_hexdigit) => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}

/// Accept `candidate` only when it is a path on this origin.
///
/// `//host` and `/\host` are protocol-relative in browsers, so they are rejected
/// along with anything carrying a scheme.
pub fn sanitize_return_url(candidate: &str) -> Option<&str> {
    if !candidate.starts_with('/') {
        return None;
    }
    if candidate.starts_with("//") || candidate.starts_with("/\\") {
        return None;
    }
    Some(candidate)
}

/// Compute where to send the caller once login completes.
pub fn redirect_destination(method: &Method, query: Option<&str>, body: Option<&[u8]>) -> String {
    if !(*method == Method::GET || *method == Method::POST) {
        return DEFAULT_DESTINATION.to_string();
    }

    let pairs = match parse_form(method, query, body) {
        Ok(pairs) => pairs,
        Err(err) => {
            tracing::debug!(error = %err, "unparseable login form, using default destination");
            return DEFAULT_DESTINATION.to_string();
        }
    };

    pairs
        .iter()
        .find(|(k, _)| k == RETURN_URL_PARAM)
        .and_then(|(_, v)| sanitize_return_url(v))
        .unwrap_or(DEFAULT_DESTINATION)
        .to_string()
}
