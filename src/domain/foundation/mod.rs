//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types and the state machine
//! trait that form the vocabulary of the concierge domain.

mod errors;
mod ids;
mod price;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{ChatId, OrderId, Sku};
pub use price::Price;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
