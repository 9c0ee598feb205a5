//! Conversation command handlers.
//!
//! Drives one chat through the ordered dialogue: category, gender,
//! product pick, size, address and confirmation.

mod handle_message;

pub use handle_message::{
    ConversationService, ConversationSettings, HandleMessageCommand, HandleMessageError,
    HandleMessageResult,
};
