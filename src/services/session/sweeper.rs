use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::SessionStore;

/// Periodically drop expired sessions from `store`.
///
/// The resolver never relies on this: expiry is always checked on read.
pub fn spawn_sweeper(store: Arc<dyn SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = store.purge_expired(Utc::now());
            if removed > 0 {
                tracing::debug!(removed, remaining = store.len(), "purged expired sessions");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use chrono::Duration as ChronoDuration;

    use super::*;
    use crate::services::session::InMemorySessionStore;

    #[tokio::test(start_paused = true)]
    async fn sweeper_purges_on_tick() {
        let store = Arc::new(InMemorySessionStore::new());
        store.put("old", "alice", Utc::now() - ChronoDuration::minutes(5));
        store.put("live", "bob", Utc::now() + ChronoDuration::hours(3));

        let handle = spawn_sweeper(store.clone(), Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;

        assert!(store.get("old").is_none());
        assert!(store.get("live").is_some());
        handle.abort();
    }
}
