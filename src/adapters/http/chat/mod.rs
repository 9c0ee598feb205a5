//! HTTP adapter for chat endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChatReplyResponse, ErrorResponse, HealthResponse, SelectionView, SendMessageRequest,
    SessionView,
};
pub use handlers::{ChatApiError, ChatHandlers};
pub use routes::chat_routes;
