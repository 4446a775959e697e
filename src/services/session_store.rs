//! Session registry storage
//!
//! Admin sessions live only in process memory: they survive until logout or
//! restart and never expire on their own.

use crate::models::AdminSession;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Storage interface for admin sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert the session unless its token is already taken.
    ///
    /// Returns `false` and leaves the existing entry untouched on a collision.
    async fn put(&self, session: AdminSession) -> bool;

    async fn get(&self, token: &str) -> Option<AdminSession>;

    /// Remove a session, returning it if it existed
    async fn delete(&self, token: &str) -> Option<AdminSession>;

    async fn contains(&self, token: &str) -> bool {
        self.get(token).await.is_some()
    }
}

/// In-memory session store guarded by one coarse lock
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, AdminSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed() -> Arc<dyn SessionStore> {
        Arc::new(Self::new())
    }

    /// Number of active sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(&self, session: AdminSession) -> bool {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.token) {
            return false;
        }
        sessions.insert(session.token.clone(), session);
        true
    }

    async fn get(&self, token: &str) -> Option<AdminSession> {
        self.sessions.read().await.get(token).cloned()
    }

    async fn delete(&self, token: &str) -> Option<AdminSession> {
        self.sessions.write().await.remove(token)
    }

    async fn contains(&self, token: &str) -> bool {
        self.sessions.read().await.contains_key(token)
    }
}
