use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// Server-held record bound to a session token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// A session is invalid at and after `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Token -> session mapping shared by the login handler and the identity resolver.
///
/// Implementations must be atomic per call: a session is either fully present or absent.
/// No implementation may perform I/O while holding its lock.
pub trait SessionStore: Send + Sync {
    /// Insert or overwrite the session stored under `token`.
    fn put(&self, token: &str, username: &str, expires_at: DateTime<Utc>);

    /// Look up `token`. Expired sessions are returned as-is; the caller checks expiry.
    fn get(&self, token: &str) -> Option<Session>;

    /// Number of stored sessions, expired ones included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every session expired at `now`. Returns the number removed.
    fn purge_expired(&self, now: DateTime<Utc>) -> usize;
}

/// Process-local store: one mutex over one map, no read tier.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn put(&self, token: &str, username: &str, expires_at: DateTime<Utc>) {
        let session = Session {
            username: username.to_string(),
            expires_at,
        };
        self.sessions.lock().insert(token.to_string(), session);
    }

    fn get(&self, token: &str) -> Option<Session> {
        self.sessions.lock().get(token).cloned()
    }

    fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;

    #[test]
    fn get_returns_what_put_stored() {
        let store = InMemorySessionStore::new();
        let expires_at = Utc::now() + Duration::hours(3);

        store.put("tok", "alice", expires_at);

        let session = store.get("tok").unwrap();
        assert_eq!(session.username, "alice");
        assert_eq!(session.expires_at, expires_at);
        assert!(store.get("other").is_none());
    }

    #[test]
    fn put_overwrites_existing_token() {
        let store = InMemorySessionStore::new();
        let expires_at = Utc::now() + Duration::hours(1);

        store.put("tok", "alice", expires_at);
        store.put("tok", "bob", expires_at);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("tok").unwrap().username, "bob");
    }

    #[test]
    fn get_does_not_drop_expired_sessions() {
        let store = InMemorySessionStore::new();
        let expired = Utc::now() - Duration::minutes(1);

        store.put("tok", "alice", expired);

        let session = store.get("tok").unwrap();
        assert!(session.is_expired_at(Utc::now()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn expiry_is_inclusive() {
        let now = Utc::now();
        let session = Session {
            username: "alice".into(),
            expires_at: now,
        };
        assert!(session.is_expired_at(now));
        assert!(!session.is_expired_at(now - Duration::seconds(1)));
    }

    #[test]
    fn purge_expired_keeps_live_sessions() {
        let store = InMemorySessionStore::new();
        let now = Utc::now();
        store.put("old", "alice", now - Duration::hours(1));
        store.put("live", "bob", now + Duration::hours(1));

        assert_eq!(store.purge_expired(now), 1);
        assert!(store.get("old").is_none());
        assert_eq!(store.get("live").unwrap().username, "bob");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_puts_keep_every_entry() {
        let store = Arc::new(InMemorySessionStore::new());
        let expires_at = Utc::now() + Duration::hours(3);

        let mut handles = Vec::new();
        for i in 0..64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.put(&format!("tok-{i}"), &format!("user-{i}"), expires_at);
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(store.len(), 64);
        for i in 0..64 {
            let session = store.get(&format!("tok-{i}")).unwrap();
            assert_eq!(session.username, format!("user-{i}"));
            assert_eq!(session.expires_at, expires_at);
        }
    }
}
