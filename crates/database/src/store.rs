use crate::error::DbError;
use async_trait::async_trait;
use core_types::{NewSession, Session};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A source of truth for recorded sessions.
///
/// The analytics layer only ever reads the full collection; writes go through
/// here so that caches in front of a store can be invalidated.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Every stored session, most recent date first.
    async fn fetch_all(&self) -> Result<Vec<Session>, DbError>;

    /// Stores a new session and returns it with its assigned id.
    async fn insert(&self, session: NewSession) -> Result<Session, DbError>;

    /// Replaces the session with the given id. `DbError::NotFound` if absent.
    async fn update(&self, id: Uuid, session: NewSession) -> Result<Session, DbError>;

    /// Removes the session with the given id. `DbError::NotFound` if absent.
    async fn delete(&self, id: Uuid) -> Result<(), DbError>;
}

/// A process-local store, used for offline serving from a JSON export and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: RwLock<Vec<Session>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store. Sessions without an id are given one.
    pub fn from_sessions(sessions: Vec<Session>) -> Self {
        let sessions = sessions
            .into_iter()
            .map(|mut session| {
                if session.id.is_nil() {
                    session.id = Uuid::new_v4();
                }
                session
            })
            .collect();
        Self {
            sessions: RwLock::new(sessions),
        }
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn fetch_all(&self) -> Result<Vec<Session>, DbError> {
        let mut sessions = self.sessions.read().await.clone();
        sessions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(sessions)
    }

    async fn insert(&self, session: NewSession) -> Result<Session, DbError> {
        let session = Session::from_new(Uuid::new_v4(), session);
        self.sessions.write().await.push(session.clone());
        Ok(session)
    }

    async fn update(&self, id: Uuid, session: NewSession) -> Result<Session, DbError> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions
            .iter_mut()
            .find(|existing| existing.id == id)
            .ok_or(DbError::NotFound)?;
        *slot = Session::from_new(id, session);
        Ok(slot.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|existing| existing.id != id);
        if sessions.len() == before {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
