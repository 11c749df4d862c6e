//! Per-request identity decision.
//!
//! TLS_CHECK -> (no verified chain) -> COOKIE_LOOKUP -> STORE_LOOKUP -> EXPIRY_CHECK -> RESOLVED.
//! Any failing step ends in `Resolution::Unauthenticated`; the HTTP layer turns that into
//! a login redirect.

use axum::http::{HeaderMap, Uri};
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::certificate::{ClientCertChain, leaf_common_name};
use super::cookie::session_token;
use super::redirect::RETURN_URL_PARAM;
use crate::services::session::SessionStore;

pub const LOGIN_PATH: &str = "/login";

/// Expected authentication gaps. Never surfaced to the end user as errors.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no session cookie")]
    NoSession,
    #[error("session not found")]
    UnknownSession,
    #[error("session expired")]
    ExpiredSession,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Certificate(String),
    Cookie(String),
    Unauthenticated(SessionError),
}

/// Resolve the caller of a single request.
///
/// A verified client certificate wins outright; the session store is not touched.
pub fn resolve(
    chain: Option<&ClientCertChain>,
    headers: &HeaderMap,
    store: &dyn SessionStore,
    now: DateTime<Utc>,
) -> Resolution {
    if let Some(name) = chain.and_then(certificate_identity) {
        return Resolution::Certificate(name);
    }

    match cookie_identity(headers, store, now) {
        Ok(username) => Resolution::Cookie(username),
        Err(err) => Resolution::Unauthenticated(err),
    }
}

fn certificate_identity(chain: &ClientCertChain) -> Option<String> {
    if chain.is_empty() {
        return None;
    }
    match leaf_common_name(chain) {
        Ok(name) => Some(name),
        Err(err) => {
            tracing::warn!(error = %err, "verified client certificate without usable common name");
            None
        }
    }
}

/// COOKIE_LOOKUP -> STORE_LOOKUP -> EXPIRY_CHECK.
pub fn cookie_identity(
    headers: &HeaderMap,
    store: &dyn SessionStore,
    now: DateTime<Utc>,
) -> Result<String, SessionError> {
    let token = session_token(headers).ok_or(SessionError::NoSession)?;
    let session = store.get(token).ok_or(SessionError::UnknownSession)?;

    if session.is_expired_at(now) {
        return Err(SessionError::ExpiredSession);
    }

    Ok(session.username)
}

/// `/login?returnURL=<current path and query>`
///
/// HTTP/2 requests arrive in absolute form (`https://host/path`); only the origin-form part
/// is carried, otherwise the sanitizer would reject it after login.
pub fn login_redirect_target(current: &Uri) -> String {
    let return_url = current.path_and_query().map_or("/", |pq| pq.as_str());
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(RETURN_URL_PARAM, return_url)
        .finish();

    format!("{LOGIN_PATH}?{query}")
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::{HeaderValue, header};
    use chrono::Duration;

    use super::*;
    use crate::services::auth::certificate::tests::{ALICE_DER, NO_CN_DER, chain_of};
    use crate::services::session::{InMemorySessionStore, Session};

    /// Store wrapper that counts every access.
    #[derive(Default)]
    pub(crate) struct CountingStore {
        pub(crate) inner: InMemorySessionStore,
        pub(crate) calls: AtomicUsize,
    }

    impl CountingStore {
        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SessionStore for CountingStore {
        fn put(&self, token: &str, username: &str, expires_at: DateTime<Utc>) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.put(token, username, expires_at)
        }

        fn get(&self, token: &str) -> Option<Session> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get(token)
        }

        fn len(&self) -> usize {
            self.inner.len()
        }

        fn purge_expired(&self, now: DateTime<Utc>) -> usize {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.purge_expired(now)
        }
    }

    fn cookie_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("auth_cookie={token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn certificate_wins_without_touching_store() {
        let store = CountingStore::default();
        store.inner.put("tok", "bob", Utc::now() + Duration::hours(1));
        let chain = chain_of(ALICE_DER);

        let got = resolve(Some(&chain), &cookie_headers("tok"), &store, Utc::now());

        assert_eq!(got, Resolution::Certificate("alice".into()));
        assert_eq!(store.calls(), 0);
    }

    #[test]
    fn empty_chain_falls_through_to_cookie() {
        let store = CountingStore::default();
        store.inner.put("tok", "bob", Utc::now() + Duration::hours(1));

        let got = resolve(
            Some(&ClientCertChain::default()),
            &cookie_headers("tok"),
            &store,
            Utc::now(),
        );

        assert_eq!(got, Resolution::Cookie("bob".into()));
        assert_eq!(store.calls(), 1);
    }

    #[test]
    fn certificate_without_cn_falls_through_to_cookie() {
        let store = InMemorySessionStore::new();
        let chain = chain_of(NO_CN_DER);

        let got = resolve(Some(&chain), &HeaderMap::new(), &store, Utc::now());

        assert_eq!(got, Resolution::Unauthenticated(SessionError::NoSession));
    }

    #[test]
    fn valid_cookie_resolves_username() {
        let store = InMemorySessionStore::new();
        store.put("tok", "bob", Utc::now() + Duration::hours(1));

        let got = resolve(None, &cookie_headers("tok"), &store, Utc::now());
        assert_eq!(got, Resolution::Cookie("bob".into()));
    }

    #[test]
    fn missing_cookie_is_no_session() {
        let store = InMemorySessionStore::new();
        let got = resolve(None, &HeaderMap::new(), &store, Utc::now());
        assert_eq!(got, Resolution::Unauthenticated(SessionError::NoSession));
    }

    #[test]
    fn unknown_token_is_unknown_session() {
        let store = InMemorySessionStore::new();
        let got = resolve(None, &cookie_headers("nope"), &store, Utc::now());
        assert_eq!(got, Resolution::Unauthenticated(SessionError::UnknownSession));
    }

    #[test]
    fn expired_session_is_rejected_even_when_stored() {
        let store = InMemorySessionStore::new();
        let now = Utc::now();
        store.put("tok", "bob", now - Duration::seconds(1));

        let got = resolve(None, &cookie_headers("tok"), &store, now);

        assert_eq!(got, Resolution::Unauthenticated(SessionError::ExpiredSession));
        assert!(store.get("tok").is_some());
    }

    #[test]
    fn login_target_carries_full_request_uri() {
        let uri: Uri = "/reports/q3?year=2024&sort=desc".parse().unwrap();
        let target = login_redirect_target(&uri);

        let (path, query) = target.split_once('?').unwrap();
        assert_eq!(path, LOGIN_PATH);
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(
            pairs,
            vec![(
                "returnURL".to_string(),
                "/reports/q3?year=2024&sort=desc".to_string()
            )]
        );
    }

    #[test]
    fn login_target_drops_scheme_and_authority_of_absolute_uri() {
        let uri: Uri = "https://gw.example/whoami?tab=2".parse().unwrap();
        assert_eq!(
            login_redirect_target(&uri),
            "/login?returnURL=%2Fwhoami%3Ftab%3D2"
        );

        let bare: Uri = "https://gw.example".parse().unwrap();
        assert_eq!(login_redirect_target(&bare), "/login?returnURL=%2F");
    }
}
