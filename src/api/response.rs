/*
 * Responsibility
 * - 302 Found responses shared by the login handler and the identity middleware
 */
use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

/// `302 Found` to `location`.
///
/// Bytes that are not visible ASCII are percent-encoded, so a decoded `returnURL`
/// can never inject header content.
pub fn found(location: &str) -> Response {
    let encoded = encode_location(location);
    match HeaderValue::from_str(&encoded) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        // unreachable after encoding, but never emit a redirect we cannot express
        Err(_) => (StatusCode::FOUND, [(header::LOCATION, HeaderValue::from_static("/"))])
            .into_response(),
    }
}

fn encode_location(location: &str) -> String {
    let mut out = String::with_capacity(location.len());
    for b in location.bytes() {
        if (0x21..=0x7e).contains(&b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}
