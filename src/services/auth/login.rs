use std::sync::Arc;

use axum::http::{HeaderValue, request::Parts};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use thiserror::Error;
use tracing::{debug, error};

use super::cookie::session_cookie;
use super::identity::{IdentityError, IdentityExtractor};
use super::token::{TokenError, generate_session_token};
use crate::services::session::SessionStore;

/// Internal faults of a login attempt. All of them surface as an opaque 500.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("identity extraction failed: {0}")]
    IdentityExtraction(#[from] IdentityError),
    #[error("identity provider returned no identity")]
    NullIdentity,
    #[error(transparent)]
    RandomSource(#[from] TokenError),
    #[error("session cookie is not a valid header value")]
    InvalidCookie,
}

/// A session minted by a successful login.
#[derive(Clone, Debug)]
pub struct IssuedSession {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
    /// `Set-Cookie` value carrying `token`.
    pub cookie: HeaderValue,
}

/// Orchestrates login: provider lookup -> token -> cookie -> store.
///
/// The redirect is left to the HTTP handler.
#[derive(Clone)]
pub struct LoginService {
    extractor: Arc<dyn IdentityExtractor>,
    sessions: Arc<dyn SessionStore>,
    session_lifetime: ChronoDuration,
}

impl std::fmt::Debug for LoginService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginService")
            .field("session_lifetime", &self.session_lifetime)
            .finish()
    }
}

impl LoginService {
    pub fn new(
        extractor: Arc<dyn IdentityExtractor>,
        sessions: Arc<dyn SessionStore>,
        session_lifetime: ChronoDuration,
    ) -> Self {
        Self {
            extractor,
            sessions,
            session_lifetime,
        }
    }

    pub fn session_lifetime(&self) -> ChronoDuration {
        self.session_lifetime
    }

    /// Identify the caller and store a fresh session for them.
    ///
    /// The provider is called before the store lock is ever taken.
    pub async fn login(&self, parts: &Parts, body: &[u8]) -> Result<IssuedSession, LoginError> {
        let user = self
            .extractor
            .extract(parts, body)
            .await
            .inspect_err(|e| error!(error = %e, "identity extraction failed"))?
            .ok_or_else(|| {
                error!("identity provider returned no identity");
                LoginError::NullIdentity
            })?;

        let token = generate_session_token()
            .inspect_err(|e| error!(error = %e, "cannot generate session token"))?;

        self.issue(token, user.username)
    }

    // A session is stored only once its cookie exists; a failed login leaves nothing behind.
    fn issue(&self, token: String, username: String) -> Result<IssuedSession, LoginError> {
        let expires_at = Utc::now() + self.session_lifetime;
        let cookie = session_cookie(&token, expires_at).ok_or_else(|| {
            error!("session cookie is not a valid header value");
            LoginError::InvalidCookie
        })?;

        self.sessions.put(&token, &username, expires_at);

        debug!(
            username = %username,
            expires_at = %expires_at,
            "session issued"
        );

        Ok(IssuedSession {
            token,
            username,
            expires_at,
            cookie,
        })
    }
}
