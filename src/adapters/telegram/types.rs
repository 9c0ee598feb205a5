//! Telegram Bot API wire types (the subset the bot uses).

use serde::{Deserialize, Serialize};

use crate::domain::conversation::OutboundMessage;

/// Envelope around every Bot API reply.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Chat {
    pub id: i64,
}

impl Update {
    /// Chat id and text, for plain text messages only.
    pub fn text_message(&self) -> Option<(i64, &str)> {
        let message = self.message.as_ref()?;
        let text = message.text.as_deref()?;
        Some((message.chat.id, text))
    }
}

#[derive(Debug, Serialize)]
pub struct GetUpdatesRequest {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

/// One outbound Bot API call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SendRequest {
    Message { chat_id: String, text: String },
    Photo { chat_id: String, photo: String, caption: String },
}

impl SendRequest {
    pub fn for_message(chat_id: &str, message: &OutboundMessage) -> Self {
        match message {
            OutboundMessage::Text { text } => Self::Message {
                chat_id: chat_id.to_string(),
                text: text.clone(),
            },
            OutboundMessage::ProductCard { image, caption } => Self::Photo {
                chat_id: chat_id.to_string(),
                photo: image.clone(),
                caption: caption.clone(),
            },
        }
    }

    /// Bot API method name.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Message { .. } => "sendMessage",
            Self::Photo { .. } => "sendPhoto",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_get_updates_reply() {
        let json = r#"{
            "ok": true,
            "result": [
                {"update_id": 10, "message": {"message_id": 1, "chat": {"id": 42, "type": "private"}, "text": "sports"}},
                {"update_id": 11, "message": {"message_id": 2, "chat": {"id": 42, "type": "private"}, "sticker": {}}},
                {"update_id": 12, "edited_message": {}}
            ]
        }"#;
        let reply: ApiResponse<Vec<Update>> = serde_json::from_str(json).unwrap();
        let updates = reply.result.unwrap();
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0].text_message(), Some((42, "sports")));
        assert_eq!(updates[1].text_message(), None);
        assert_eq!(updates[2].text_message(), None);
    }

    #[test]
    fn error_reply_carries_description() {
        let json = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;
        let reply: ApiResponse<Vec<Update>> = serde_json::from_str(json).unwrap();
        assert!(!reply.ok);
        assert_eq!(reply.description.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn product_card_becomes_send_photo() {
        let card = OutboundMessage::ProductCard {
            image: "https://img.example/a.jpg".into(),
            caption: "1. Swift Trainer".into(),
        };
        let request = SendRequest::for_message("42", &card);
        assert_eq!(request.method(), "sendPhoto");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["photo"], "https://img.example/a.jpg");
        assert_eq!(json["chat_id"], "42");
    }

    #[test]
    fn text_becomes_send_message() {
        let request = SendRequest::for_message("42", &OutboundMessage::text("hi"));
        assert_eq!(request.method(), "sendMessage");
        assert_eq!(serde_json::to_value(&request).unwrap()["text"], "hi");
    }
}
