//! HTTP handlers for chat endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tokio::task::JoinError;

use crate::application::{ConversationService, HandleMessageCommand, HandleMessageError};
use crate::domain::foundation::ChatId;

use super::dto::{ChatReplyResponse, ErrorResponse, HealthResponse, SendMessageRequest, SessionView};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ChatHandlers {
    service: Arc<ConversationService>,
}

impl ChatHandlers {
    pub fn new(service: Arc<ConversationService>) -> Self {
        Self { service }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/chats/:chat_id/messages - Handle one chat message
pub async fn send_message(
    State(handlers): State<ChatHandlers>,
    Path(chat_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<ChatReplyResponse>, ChatApiError> {
    let chat_id = parse_chat_id(chat_id)?;
    let service = Arc::clone(&handlers.service);
    let command = HandleMessageCommand::new(chat_id, req.text);
    // Detached so a timed-out or disconnected request cannot stop the
    // message halfway through the order pipeline.
    let result = tokio::spawn(async move { service.handle(command).await })
        .await
        .map_err(task_failed)??;
    Ok(Json(result.into()))
}

/// POST /api/chats/:chat_id/restart - Drop the session and greet again
pub async fn restart_chat(
    State(handlers): State<ChatHandlers>,
    Path(chat_id): Path<String>,
) -> Result<Json<ChatReplyResponse>, ChatApiError> {
    let chat_id = parse_chat_id(chat_id)?;
    let service = Arc::clone(&handlers.service);
    let result = tokio::spawn(async move { service.restart(chat_id).await })
        .await
        .map_err(task_failed)??;
    Ok(Json(result.into()))
}

/// GET /api/chats/:chat_id/session - Current session snapshot
pub async fn get_session(
    State(handlers): State<ChatHandlers>,
    Path(chat_id): Path<String>,
) -> Result<Json<SessionView>, ChatApiError> {
    let chat_id = parse_chat_id(chat_id)?;
    match handlers.service.session(&chat_id).await? {
        Some(session) => Ok(Json(SessionView::from(&session))),
        None => Err(ChatApiError::NotFound(chat_id.to_string())),
    }
}

/// GET /health - Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

fn parse_chat_id(raw: String) -> Result<ChatId, ChatApiError> {
    ChatId::new(raw).map_err(|e| ChatApiError::BadRequest(e.to_string()))
}

fn task_failed(err: JoinError) -> ChatApiError {
    ChatApiError::Internal(format!("Message task failed: {}", err))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts handler errors to HTTP responses.
#[derive(Debug)]
pub enum ChatApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<HandleMessageError> for ChatApiError {
    fn from(err: HandleMessageError) -> Self {
        match err {
            HandleMessageError::EmptyText => ChatApiError::BadRequest(err.to_string()),
            other => ChatApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ChatApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            ChatApiError::NotFound(id) => {
                (StatusCode::NOT_FOUND, ErrorResponse::not_found("Session", &id))
            }
            ChatApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal("An internal error occurred"),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}
