//! Per-chat message dispatch.
//!
//! Each active chat gets one queue and one worker task, so a chat's
//! messages are handled strictly in arrival order while different chats
//! run concurrently. A worker that stays idle for `idle_timeout` removes
//! itself; the next message for that chat starts a fresh one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::application::handlers::{ConversationService, HandleMessageCommand, HandleMessageError};
use crate::domain::foundation::ChatId;
use crate::ports::MessageSink;

/// Routes inbound chat messages to per-chat workers.
#[derive(Clone)]
pub struct ChatDispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    service: Arc<ConversationService>,
    sink: Arc<dyn MessageSink>,
    idle_timeout: Duration,
    workers: Mutex<HashMap<ChatId, mpsc::UnboundedSender<String>>>,
}

impl ChatDispatcher {
    pub fn new(
        service: Arc<ConversationService>,
        sink: Arc<dyn MessageSink>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                service,
                sink,
                idle_timeout,
                workers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Queues `text` for `chat_id`. Must be called from within a tokio runtime.
    pub fn dispatch(&self, chat_id: ChatId, text: String) {
        let mut workers = self.inner.workers();
        let text = match workers.get(&chat_id) {
            Some(queue) => match queue.send(text) {
                Ok(()) => return,
                Err(mpsc::error::SendError(text)) => text,
            },
            None => text,
        };

        let (tx, rx) = mpsc::unbounded_channel();
        // Fresh channel with its receiver in hand; send cannot fail.
        let _ = tx.send(text);
        workers.insert(chat_id.clone(), tx);
        tracing::debug!(chat_id = %chat_id, "Starting chat worker");
        tokio::spawn(run_worker(Arc::clone(&self.inner), chat_id, rx));
    }

    /// Number of chats with a live worker.
    pub fn active_chats(&self) -> usize {
        self.inner.workers().len()
    }
}

impl DispatcherInner {
    fn workers(&self) -> MutexGuard<'_, HashMap<ChatId, mpsc::UnboundedSender<String>>> {
        self.workers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn handle(&self, chat_id: &ChatId, text: String) {
        let result = self
            .service
            .handle(HandleMessageCommand::new(chat_id.clone(), text))
            .await;

        let replies = match result {
            Ok(result) => result.replies,
            Err(HandleMessageError::EmptyText) => {
                tracing::debug!(chat_id = %chat_id, "Ignoring empty message");
                return;
            }
            Err(err) => {
                tracing::error!(chat_id = %chat_id, error = %err, "Failed to handle message");
                return;
            }
        };

        if let Err(err) = self.sink.deliver(chat_id, &replies).await {
            tracing::warn!(chat_id = %chat_id, error = %err, "Failed to deliver replies");
        }
    }
}

async fn run_worker(
    inner: Arc<DispatcherInner>,
    chat_id: ChatId,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    loop {
        let text = match tokio::time::timeout(inner.idle_timeout, rx.recv()).await {
            Ok(Some(text)) => text,
            Ok(None) => break,
            Err(_) => {
                // Decide under the map lock so a concurrent dispatch either
                // lands in this queue or starts a new worker.
                let mut workers = inner.workers();
                match rx.try_recv() {
                    Ok(text) => {
                        drop(workers);
                        text
                    }
                    Err(_) => {
                        workers.remove(&chat_id);
                        tracing::debug!(chat_id = %chat_id, "Chat worker idle, stopping");
                        break;
                    }
                }
            }
        };
        inner.handle(&chat_id, text).await;
    }
}
