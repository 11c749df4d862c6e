//! Session token generation.
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use thiserror::Error;

/// Bytes of OS entropy behind every session token.
pub const SESSION_TOKEN_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum TokenError {
    /// The OS entropy source could not be read. Never retried with a weaker source.
    #[error("random source unavailable: {0}")]
    RandomSource(getrandom::Error),
}

/// Generate an opaque session token.
///
/// 32 bytes from the OS CSPRNG -> URL-safe base64 without padding, so the value
/// can be carried as a cookie value without escaping.
pub fn generate_session_token() -> Result<String, TokenError> {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    getrandom::fill(&mut bytes).map_err(TokenError::RandomSource)?;

    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
