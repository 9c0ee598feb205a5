//! Conversation domain module.
//!
//! The per-chat dialogue: stages and their transitions, the session data
//! each stage carries, free-text field extraction, and the pure stage
//! table that turns a message into a [`Decision`].

mod engine;
mod extractor;
mod message;
mod session;
mod stage;

pub use engine::{interpret, Decision, RepromptReason};
pub use extractor::{
    extract_category, extract_confirmation, extract_gender, extract_pincode, extract_size,
    is_more_request, is_restart_command, names_shown_product, normalize, resolve_selection,
    Confirmation,
};
pub use message::OutboundMessage;
pub use session::{
    Browsing, DialogueState, OrderDraft, Pincode, SelectedProduct, Session, ShoeSize,
};
pub use stage::Stage;

#[cfg(test)]
pub(crate) use session::fixtures;
