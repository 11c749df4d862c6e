/*
 * Responsibility
 * - Boundary to the external identity provider integration
 * - The gateway only needs "who is this" from a raw request; the provider protocol stays behind the trait
 */
use async_trait::async_trait;
use axum::http::{HeaderName, request::Parts};
use thiserror::Error;

/// Identity returned by the provider at login time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserInfo {
    pub username: String,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity header {0} is not valid UTF-8")]
    InvalidHeader(HeaderName),
    #[error("identity provider error: {0}")]
    Provider(String),
}

/// Derives the caller's identity from a request.
///
/// Contract:
/// - `Ok(Some(_))` => identity with a username
/// - `Ok(None)`    => no identity; the gateway treats this as an internal fault, not a login failure
/// - `Err(_)`      => provider failure
///
/// Implementations must not block indefinitely; the request timeout layer bounds the call.
#[async_trait]
pub trait IdentityExtractor: Send + Sync {
    async fn extract(&self, parts: &Parts, body: &[u8]) -> Result<Option<UserInfo>, IdentityError>;
}

/// Trusts a header set by an authenticating upstream (reverse proxy / SSO front end).
#[derive(Clone, Debug)]
pub struct HeaderIdentityExtractor {
    header: HeaderName,
}

impl HeaderIdentityExtractor {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }
}

#[async_trait]
impl IdentityExtractor for HeaderIdentityExtractor {
    async fn extract(
        &self,
        parts: &Parts,
        _body: &[u8],
    ) -> Result<Option<UserInfo>, IdentityError> {
        let Some(value) = parts.headers.get(&self.header) else {
            return Ok(None);
        };
        let username = value
            .to_str()
            .map_err(|_| IdentityError::InvalidHeader(self.header.clone()))?
            .trim();

        if username.is_empty() {
            return Ok(None);
        }

        Ok(Some(UserInfo {
            username: username.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderValue, Request};

    use super::*;

    fn parts_with(header: Option<HeaderValue>) -> Parts {
        let mut builder = Request::builder().uri("/login");
        if let Some(v) = header {
            builder = builder.header("x-forwarded-user", v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn extractor() -> HeaderIdentityExtractor {
        HeaderIdentityExtractor::new(HeaderName::from_static("x-forwarded-user"))
    }

    #[tokio::test]
    async fn reads_username_from_header() {
        let parts = parts_with(Some(HeaderValue::from_static(" alice ")));
        let info = extractor().extract(&parts, b"").await.unwrap();
        assert_eq!(
            info,
            Some(UserInfo {
                username: "alice".into()
            })
        );
    }

    #[tokio::test]
    async fn missing_or_blank_header_is_no_identity() {
        let parts = parts_with(None);
        assert!(extractor().extract(&parts, b"").await.unwrap().is_none());

        let parts = parts_with(Some(HeaderValue::from_static("  ")));
        assert!(extractor().extract(&parts, b"").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn non_utf8_header_is_an_error() {
        let parts = parts_with(Some(HeaderValue::from_bytes(&[0xff, 0x61]).unwrap()));
        let err = extractor().extract(&parts, b"").await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidHeader(_)));
    }
}
