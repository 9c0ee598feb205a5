//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the conversation and the outside world. Adapters implement these ports.
//!
//! ## Collaborator Ports
//!
//! - `ProductFinder` - Paged catalog search
//! - `AvailabilityChecker` - Stock check for one SKU
//! - `PaymentProcessor` - Payment for one order
//! - `OrderRecorder` - Append-only order log
//! - `ReplyComposer` - Instruction to chat text
//!
//! ## State Ports
//!
//! - `SessionStore` - Per-chat sessions with per-key locking
//!
//! ## Transport Ports
//!
//! - `MessageSink` - Delivers replies to a chat transport

mod availability_checker;
mod collaborator;
mod message_sink;
mod order_recorder;
mod payment_processor;
mod product_finder;
mod reply_composer;
mod session_store;

pub use availability_checker::{AvailabilityChecker, AvailabilityReport, AvailabilityRequest};
pub use collaborator::{call_with_timeout, CollaboratorError, CollaboratorErrorCode};
pub use message_sink::MessageSink;
pub use order_recorder::{OrderLine, OrderRecord, OrderRecorder, RecordAck};
pub use payment_processor::{PaymentProcessor, PaymentReceipt, PaymentRequest};
pub use product_finder::{ProductFinder, ProductQuery, MAX_PAGE_SIZE};
pub use reply_composer::{ReplyComposer, ReplyContext, ReplyInstruction};
pub use session_store::{SessionLock, SessionStore, SessionStoreError};
