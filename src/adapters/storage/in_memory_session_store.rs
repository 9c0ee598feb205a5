//! In-Memory Session Store Adapter
//!
//! Keeps every chat session in process memory. A restart drops all
//! in-flight conversations; callers treat a missing session as the
//! initial stage.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use tokio::sync::{Mutex, RwLock};

use crate::domain::conversation::Session;
use crate::domain::foundation::ChatId;
use crate::ports::{SessionLock, SessionStore, SessionStoreError};

type LockTable = HashMap<ChatId, Arc<Mutex<()>>>;

/// In-memory storage for chat sessions with one async mutex per chat.
///
/// A chat's mutex exists only while someone holds or waits for it.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<ChatId, Session>>>,
    locks: Arc<std::sync::Mutex<LockTable>>,
}

impl InMemorySessionStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Number of chats currently locked or waited on.
    pub fn lock_count(&self) -> usize {
        lock_table(&self.locks).len()
    }

    fn mutex_for(&self, chat_id: &ChatId) -> Arc<Mutex<()>> {
        let mut locks = lock_table(&self.locks);
        Arc::clone(
            locks
                .entry(chat_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }
}

fn lock_table(locks: &std::sync::Mutex<LockTable>) -> std::sync::MutexGuard<'_, LockTable> {
    locks.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drops the chat's entry unless another caller still holds a handle to it.
fn prune(locks: &std::sync::Mutex<LockTable>, chat_id: &ChatId) {
    let mut table = lock_table(locks);
    if table
        .get(chat_id)
        .map_or(false, |mutex| Arc::strong_count(mutex) == 1)
    {
        table.remove(chat_id);
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, chat_id: &ChatId) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.sessions.read().await.get(chat_id).cloned())
    }

    async fn put(&self, session: Session) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.chat_id.clone(), session);
        Ok(())
    }

    async fn delete(&self, chat_id: &ChatId) -> Result<bool, SessionStoreError> {
        Ok(self.sessions.write().await.remove(chat_id).is_some())
    }

    async fn lock(&self, chat_id: &ChatId) -> Result<SessionLock, SessionStoreError> {
        let guard = self.mutex_for(chat_id).lock_owned().await;
        let locks = Arc::clone(&self.locks);
        let chat_id = chat_id.clone();
        Ok(SessionLock::new(guard).on_release(move || prune(&locks, &chat_id)))
    }
}
