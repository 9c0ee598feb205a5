//! HTTP routes for chat endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_session, health, restart_chat, send_message, ChatHandlers};

/// Creates the chat router with all endpoints, including `/health`.
pub fn chat_routes(handlers: ChatHandlers) -> Router {
    Router::new()
        .route("/api/chats/:chat_id/messages", post(send_message))
        .route("/api/chats/:chat_id/restart", post(restart_chat))
        .route("/api/chats/:chat_id/session", get(get_session))
        .route("/health", get(health))
        .with_state(handlers)
}
