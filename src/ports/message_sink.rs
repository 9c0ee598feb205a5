//! Message Sink port - delivers replies back to a chat transport.

use async_trait::async_trait;

use super::CollaboratorError;
use crate::domain::conversation::OutboundMessage;
use crate::domain::foundation::ChatId;

#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Sends `messages` to `chat_id` in order.
    async fn deliver(
        &self,
        chat_id: &ChatId,
        messages: &[OutboundMessage],
    ) -> Result<(), CollaboratorError>;
}
