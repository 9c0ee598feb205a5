//! Generative reply composer over an OpenAI-compatible chat API.
//!
//! The template composer writes a draft; the model rephrases it. Any
//! failure (network, status, empty reply) falls back to the draft, so
//! composition never fails the conversation.
//!
//! # Configuration
//!
//! ```ignore
//! let config = LlmComposerConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let composer = LlmReplyComposer::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use super::TemplateReplyComposer;
use crate::ports::{CollaboratorError, ReplyComposer, ReplyContext, ReplyInstruction};

const SYSTEM_PROMPT: &str = "You are a friendly assistant for an online footwear store chatting \
with a shopper. Rewrite the draft reply in a warm, concise tone. Keep every fact exactly: \
product names, prices, sizes, pincodes, addresses and order ids. Keep any question the draft \
asks. Reply with the message text only.";

/// Configuration for the generative composer.
#[derive(Debug, Clone)]
pub struct LlmComposerConfig {
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-4o-mini").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl LlmComposerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(8),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

pub struct LlmReplyComposer {
    config: LlmComposerConfig,
    client: Client,
    drafts: TemplateReplyComposer,
}

impl LlmReplyComposer {
    pub fn new(config: LlmComposerConfig) -> Result<Self, CollaboratorError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CollaboratorError::unavailable(format!("HTTP client: {}", e)))?;
        Ok(Self {
            config,
            client,
            drafts: TemplateReplyComposer::new(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn build_request(
        &self,
        instruction: ReplyInstruction,
        context: &ReplyContext,
        draft: &str,
    ) -> ChatRequest {
        let facts = serde_json::json!({
            "instruction": instruction.as_str(),
            "context": context,
            "draft": draft,
        });
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: facts.to_string(),
                },
            ],
            temperature: 0.4,
            max_tokens: 300,
        }
    }

    async fn rephrase(
        &self,
        instruction: ReplyInstruction,
        context: &ReplyContext,
        draft: &str,
    ) -> Result<String, CollaboratorError> {
        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&self.build_request(instruction, context, draft))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CollaboratorError::timeout("compose_reply", self.config.timeout)
                } else {
                    CollaboratorError::unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::unavailable(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::malformed_response(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| CollaboratorError::malformed_response("No choices in response"))
    }
}

#[async_trait]
impl ReplyComposer for LlmReplyComposer {
    async fn compose(
        &self,
        instruction: ReplyInstruction,
        context: &ReplyContext,
    ) -> Result<String, CollaboratorError> {
        let draft = self.drafts.render(instruction, context);
        match self.rephrase(instruction, context, &draft).await {
            Ok(text) => Ok(text),
            Err(err) => {
                tracing::warn!(
                    instruction = %instruction,
                    error = %err,
                    "Reply model failed, using template"
                );
                Ok(draft)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Category;

    fn composer(base_url: &str) -> LlmReplyComposer {
        LlmReplyComposer::new(
            LlmComposerConfig::new("test-key")
                .with_base_url(base_url)
                .with_timeout(Duration::from_millis(500)),
        )
        .unwrap()
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let c = composer("http://localhost:9999/v1/");
        assert_eq!(c.completions_url(), "http://localhost:9999/v1/chat/completions");
    }

    #[test]
    fn request_carries_draft_and_context() {
        let c = composer("http://localhost:9999/v1");
        let context = ReplyContext::default().with_category(Category::Boots);
        let request = c.build_request(ReplyInstruction::AskGender, &context, "draft text");

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        let user: serde_json::Value = serde_json::from_str(&request.messages[1].content).unwrap();
        assert_eq!(user["instruction"], "ask_gender");
        assert_eq!(user["context"]["category"], "boots");
        assert_eq!(user["draft"], "draft text");
    }

    #[test]
    fn api_key_is_not_debug_printed() {
        let config = LlmComposerConfig::new("sk-very-secret");
        assert!(!format!("{:?}", config).contains("sk-very-secret"));
    }

    #[tokio::test]
    async fn unreachable_backend_falls_back_to_template() {
        // Port 9 (discard) on loopback refuses connections.
        let c = composer("http://127.0.0.1:9/v1");
        let context = ReplyContext::default().with_category(Category::Boots);

        let text = c.compose(ReplyInstruction::AskGender, &context).await.unwrap();
        assert_eq!(
            text,
            TemplateReplyComposer::new().render(ReplyInstruction::AskGender, &context)
        );
    }
}
