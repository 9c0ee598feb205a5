//! Long-polling loop feeding Telegram updates into the chat dispatcher.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::client::TelegramClient;
use super::types::Update;
use crate::application::ChatDispatcher;
use crate::domain::foundation::ChatId;

const ERROR_BACKOFF: Duration = Duration::from_secs(3);

pub struct TelegramPoller {
    client: Arc<TelegramClient>,
    dispatcher: ChatDispatcher,
    offset: i64,
}

impl TelegramPoller {
    pub fn new(client: Arc<TelegramClient>, dispatcher: ChatDispatcher) -> Self {
        Self {
            client,
            dispatcher,
            offset: 0,
        }
    }

    /// Polls until `shutdown` flips to true. A failed poll waits
    /// `ERROR_BACKOFF` before the next one.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("Telegram poller started");
        let mut failed = false;
        loop {
            let delay = if failed { ERROR_BACKOFF } else { Duration::ZERO };
            let client = Arc::clone(&self.client);
            let offset = self.offset;
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                batch = async move {
                    tokio::time::sleep(delay).await;
                    client.get_updates(offset).await
                } => match batch {
                    Ok(updates) => {
                        failed = false;
                        self.route(updates);
                    }
                    Err(error) => {
                        tracing::warn!(error = %error, "getUpdates failed, backing off");
                        failed = true;
                    }
                },
            }
        }
        tracing::info!("Telegram poller stopped");
    }

    /// Advances the offset past `updates` and dispatches their text messages.
    fn route(&mut self, updates: Vec<Update>) {
        for update in updates {
            self.offset = self.offset.max(update.update_id + 1);
            let Some((chat, text)) = update.text_message() else {
                tracing::debug!(update_id = update.update_id, "Skipping non-text update");
                continue;
            };
            match ChatId::new(chat.to_string()) {
                Ok(chat_id) => self.dispatcher.dispatch(chat_id, text.to_string()),
                Err(error) => {
                    tracing::warn!(update_id = update.update_id, error = %error, "Bad chat id")
                }
            }
        }
    }
}
