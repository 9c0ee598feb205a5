//! HTTP DTOs for chat endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::HandleMessageResult;
use crate::domain::conversation::{DialogueState, OutboundMessage, Session, Stage};
use crate::domain::foundation::Price;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One inbound chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Replies produced for one message (or a restart).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReplyResponse {
    pub chat_id: String,
    pub stage: Stage,
    pub replies: Vec<OutboundMessage>,
}

impl From<HandleMessageResult> for ChatReplyResponse {
    fn from(result: HandleMessageResult) -> Self {
        Self {
            chat_id: result.chat_id.to_string(),
            stage: result.stage,
            replies: result.replies,
        }
    }
}

/// Picked product as shown in a session view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionView {
    pub sku: String,
    pub name: String,
    pub price: Price,
}

/// Read-only snapshot of a chat session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub chat_id: String,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    pub product_offset: usize,
    pub has_more_products: bool,
    pub shown_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        let state = &session.state;
        let browsing = state.browsing();
        let (size, pincode) = match state {
            DialogueState::AwaitingAddress { size, .. } => {
                (Some(size.to_string()), None)
            }
            DialogueState::AwaitingConfirmation { order, .. } => {
                (Some(order.size.to_string()), Some(order.pincode.to_string()))
            }
            _ => (None, None),
        };
        Self {
            chat_id: session.chat_id.to_string(),
            stage: session.stage(),
            category: state.category().map(|c| c.as_str().to_string()),
            gender: state.gender().map(|g| g.as_str().to_string()),
            selection: state.selection().map(|s| SelectionView {
                sku: s.sku.to_string(),
                name: s.name.clone(),
                price: s.price,
            }),
            size,
            pincode,
            product_offset: browsing.map(|b| b.product_offset).unwrap_or(0),
            has_more_products: browsing.map(|b| b.has_more_products).unwrap_or(false),
            shown_count: session.shown_count,
            created_at: session.created_at.to_rfc3339(),
            updated_at: session.updated_at.to_rfc3339(),
        }
    }
}

/// Liveness probe body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
