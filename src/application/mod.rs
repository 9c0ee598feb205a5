//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod dispatcher;
pub mod handlers;

pub use dispatcher::ChatDispatcher;
pub use handlers::{
    ConversationService, ConversationSettings, HandleMessageCommand, HandleMessageError,
    HandleMessageResult, PlaceOrderCommand, PlaceOrderError, PlaceOrderHandler, PlaceOrderOutcome,
};
