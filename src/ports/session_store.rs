//! Session Store port - per-chat session state with explicit locking.
//!
//! Sessions live only as long as the store does; the in-memory adapter
//! loses every conversation on process restart.

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use crate::domain::conversation::Session;
use crate::domain::foundation::ChatId;

/// Exclusive hold on one chat. Dropping it releases the chat.
pub struct SessionLock {
    guard: Option<OwnedMutexGuard<()>>,
    on_release: Option<Box<dyn FnOnce() + Send>>,
}

impl SessionLock {
    pub fn new(guard: OwnedMutexGuard<()>) -> Self {
        Self {
            guard: Some(guard),
            on_release: None,
        }
    }

    /// Runs `hook` once the chat has been released.
    pub fn on_release(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.on_release = Some(Box::new(hook));
        self
    }
}

impl std::fmt::Debug for SessionLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLock")
            .field("held", &self.guard.is_some())
            .finish()
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        drop(self.guard.take());
        if let Some(hook) = self.on_release.take() {
            hook();
        }
    }
}

/// Errors that can occur during session store operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Failed to serialize session: {0}")]
    SerializationFailed(String),

    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

/// Port for reading and writing chat sessions.
///
/// Callers that read, modify and write a session must hold the chat's
/// [`SessionLock`] across the whole sequence; `get`/`put`/`delete` do not
/// lock on their own.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the session for `chat_id`, or `None` if the chat is new.
    async fn get(&self, chat_id: &ChatId) -> Result<Option<Session>, SessionStoreError>;

    /// Inserts or replaces the session under its chat id.
    async fn put(&self, session: Session) -> Result<(), SessionStoreError>;

    /// Removes the session. Returns true if one existed.
    async fn delete(&self, chat_id: &ChatId) -> Result<bool, SessionStoreError>;

    /// Waits for exclusive access to `chat_id`. Different chats never
    /// contend with each other.
    async fn lock(&self, chat_id: &ChatId) -> Result<SessionLock, SessionStoreError>;
}
