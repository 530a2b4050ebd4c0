use crate::error::DbError;
use crate::store::SessionStore;
use core_types::{NewSession, Session};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

#[derive(Debug)]
struct Snapshot {
    sessions: Arc<Vec<Session>>,
    fetched_at: Instant,
}

/// Holds the whole session collection in memory for a fixed time-to-live, so
/// that every stats request can be answered from a single store read.
///
/// Readers share one `Arc` snapshot. Writes made through the cache drop the
/// snapshot so the next read sees them.
#[derive(Debug)]
pub struct SessionCache<S> {
    store: S,
    ttl: Duration,
    snapshot: RwLock<Option<Snapshot>>,
}

impl<S: SessionStore> SessionCache<S> {
    pub fn new(store: S, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            snapshot: RwLock::new(None),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The cached collection, refetched from the store once it is older than the TTL.
    pub async fn sessions(&self) -> Result<Arc<Vec<Session>>, DbError> {
        let cached = self.fresh(&*self.snapshot.read().await);
        if let Some(sessions) = cached {
            return Ok(sessions);
        }

        let mut guard = self.snapshot.write().await;
        // Another request may have refilled it while we waited for the lock.
        if let Some(sessions) = self.fresh(&guard) {
            return Ok(sessions);
        }

        let sessions = Arc::new(self.store.fetch_all().await?);
        tracing::debug!(sessions = sessions.len(), "Session cache refilled.");
        *guard = Some(Snapshot {
            sessions: Arc::clone(&sessions),
            fetched_at: Instant::now(),
        });
        Ok(sessions)
    }

    fn fresh(&self, snapshot: &Option<Snapshot>) -> Option<Arc<Vec<Session>>> {
        snapshot
            .as_ref()
            .filter(|snapshot| snapshot.fetched_at.elapsed() <= self.ttl)
            .map(|snapshot| Arc::clone(&snapshot.sessions))
    }

    /// Drops the snapshot; the next read goes to the store.
    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
    }

    /// Age of the current snapshot, `None` when nothing is cached.
    pub async fn age(&self) -> Option<Duration> {
        self.snapshot
            .read()
            .await
            .as_ref()
            .map(|snapshot| snapshot.fetched_at.elapsed())
    }

    pub async fn insert(&self, session: NewSession) -> Result<Session, DbError> {
        let created = self.store.insert(session).await?;
        self.invalidate().await;
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, session: NewSession) -> Result<Session, DbError> {
        let updated = self.store.update(id, session).await?;
        self.invalidate().await;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        self.store.delete(id).await?;
        self.invalidate().await;
        Ok(())
    }
}
