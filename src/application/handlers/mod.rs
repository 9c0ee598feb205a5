//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over the ports.

pub mod conversation;
pub mod order;

pub use conversation::{
    ConversationService, ConversationSettings, HandleMessageCommand, HandleMessageError,
    HandleMessageResult,
};
pub use order::{PlaceOrderCommand, PlaceOrderError, PlaceOrderHandler, PlaceOrderOutcome};
