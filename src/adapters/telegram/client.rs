//! Telegram Bot API client.
//!
//! Implements [`MessageSink`] with `sendMessage`/`sendPhoto` and exposes
//! `getUpdates` for the poller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::{ApiResponse, GetUpdatesRequest, SendRequest, Update};
use crate::domain::conversation::OutboundMessage;
use crate::domain::foundation::ChatId;
use crate::ports::{CollaboratorError, MessageSink};

/// Extra time on top of the long-poll timeout before the HTTP call gives up.
const POLL_GRACE: Duration = Duration::from_secs(10);

pub struct TelegramClient {
    token: SecretString,
    api_base: String,
    poll_timeout: Duration,
    client: Client,
}

impl TelegramClient {
    pub fn new(
        token: SecretString,
        api_base: impl Into<String>,
        poll_timeout: Duration,
    ) -> Result<Self, CollaboratorError> {
        let client = Client::builder()
            .timeout(poll_timeout + POLL_GRACE)
            .build()
            .map_err(|e| CollaboratorError::unavailable(format!("HTTP client: {}", e)))?;
        Ok(Self {
            token,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            poll_timeout,
            client,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token.expose_secret(), method)
    }

    /// Long-polls for updates with id >= `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, CollaboratorError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: &["message"],
        };
        self.call("getUpdates", &request).await
    }

    async fn send(&self, request: &SendRequest) -> Result<(), CollaboratorError> {
        self.call::<_, serde_json::Value>(request.method(), request)
            .await
            .map(|_| ())
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, CollaboratorError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            // reqwest errors embed the URL, which carries the token.
            .map_err(|e| CollaboratorError::unavailable(format!("{}: {}", method, e.without_url())))?;

        let status = response.status();
        let reply: ApiResponse<T> = response.json().await.map_err(|e| {
            CollaboratorError::malformed_response(format!("{}: {}", method, e.without_url()))
        })?;

        if !reply.ok {
            return Err(CollaboratorError::unavailable(format!(
                "{} failed ({}): {}",
                method,
                status,
                reply.description.unwrap_or_default()
            )));
        }
        reply
            .result
            .ok_or_else(|| CollaboratorError::malformed_response(format!("{}: missing result", method)))
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_base", &self.api_base)
            .field("poll_timeout", &self.poll_timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MessageSink for TelegramClient {
    async fn deliver(
        &self,
        chat_id: &ChatId,
        messages: &[OutboundMessage],
    ) -> Result<(), CollaboratorError> {
        for message in messages {
            self.send(&SendRequest::for_message(chat_id.as_str(), message))
                .await?;
        }
        Ok(())
    }
}
