//! In-memory session registry. Nothing here outlives the process.
//!
//! Each session sits behind its own mutex, held for the whole of an action
//! (including model calls), so actions on one session are serialized while
//! other sessions proceed independently. A page that closes without sending
//! its DELETE leaves its session behind; `spawn_idle_eviction` sweeps those.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::interview::session::Session;

pub type SessionHandle = Arc<Mutex<Session>>;

const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

struct Entry {
    handle: SessionHandle,
    last_active: Instant,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session and returns its handle.
    pub async fn create(&self) -> SessionHandle {
        let session = Session::new();
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        let entry = Entry {
            handle: handle.clone(),
            last_active: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        handle
    }

    /// Looks up a session and marks it active.
    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_active = Instant::now();
        Some(entry.handle.clone())
    }

    /// Discards a session. Returns false if it did not exist.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions untouched for at least `max_idle` and returns how many
    /// went. A session whose lock is held is mid-action and always stays.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            now.duration_since(entry.last_active) < max_idle || entry.handle.try_lock().is_err()
        });
        before - sessions.len()
    }

    /// Sweeps idle sessions in the background for as long as the process runs.
    /// `max_idle` must be non-zero.
    pub fn spawn_idle_eviction(&self, max_idle: Duration) -> JoinHandle<()> {
        let store = self.clone();
        let period = max_idle.min(MAX_SWEEP_INTERVAL);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(max_idle).await;
                if evicted > 0 {
                    info!(
                        "Evicted {evicted} idle sessions, {} remaining",
                        store.count().await
                    );
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: Duration = Duration::from_secs(30);

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = SessionStore::new();
        let handle = store.create().await;
        let id = handle.lock().await.id;

        assert_eq!(store.count().await, 1);
        let fetched = store.get(id).await.unwrap();
        assert!(Arc::ptr_eq(&handle, &fetched));

        assert!(store.remove(id).await);
        assert!(!store.remove(id).await);
        assert!(store.get(id).await.is_none());
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = SessionStore::new();
        let a = store.create().await;
        let b = store.create().await;
        let (id_a, id_b) = (a.lock().await.id, b.lock().await.id);
        assert_ne!(id_a, id_b);

        // Holding one session's lock does not block access to another.
        let _guard = a.lock().await;
        let other = store.get(id_b).await.unwrap();
        assert!(other.try_lock().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_sessions_are_evicted() {
        let store = SessionStore::new();
        for _ in 0..100 {
            store.create().await;
        }

        tokio::time::advance(IDLE - Duration::from_secs(1)).await;
        assert_eq!(store.evict_idle(IDLE).await, 0);
        assert_eq!(store.count().await, 100);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.evict_idle(IDLE).await, 100);
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_access_keeps_session_alive() {
        let store = SessionStore::new();
        let active = store.create().await.lock().await.id;
        let abandoned = store.create().await.lock().await.id;

        tokio::time::advance(IDLE / 2).await;
        assert!(store.get(active).await.is_some());
        tokio::time::advance(IDLE / 2).await;

        assert_eq!(store.evict_idle(IDLE).await, 1);
        assert!(store.get(active).await.is_some());
        assert!(store.get(abandoned).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_locked_session_is_not_evicted() {
        let store = SessionStore::new();
        let handle = store.create().await;
        let id = handle.lock().await.id;

        let _busy = handle.lock().await;
        tokio::time::advance(IDLE * 2).await;
        assert_eq!(store.evict_idle(IDLE).await, 0);
        assert!(store.get(id).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_eviction_sweeps_idle_sessions() {
        let store = SessionStore::new();
        let sweeper = store.spawn_idle_eviction(IDLE);
        store.create().await;
        assert_eq!(store.count().await, 1);

        tokio::time::sleep(IDLE * 2 + Duration::from_secs(1)).await;
        assert_eq!(store.count().await, 0);
        sweeper.abort();
    }
}
