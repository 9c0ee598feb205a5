//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the conversation to external systems:
//! - `catalog` - File-backed and in-memory product search and stock checks
//! - `composer` - Template and model-backed reply composition
//! - `http` - JSON API over axum
//! - `orders` - Order log (JSON Lines file, in-memory)
//! - `payment` - Simulated and mock payment processors
//! - `storage` - In-memory session store
//! - `telegram` - Telegram Bot API transport

pub mod catalog;
pub mod composer;
pub mod http;
pub mod orders;
pub mod payment;
pub mod storage;
pub mod telegram;

pub use catalog::{InMemoryCatalog, JsonCatalog};
pub use composer::{LlmComposerConfig, LlmReplyComposer, TemplateReplyComposer};
pub use orders::{InMemoryOrderRecorder, JsonOrderRecorder};
pub use payment::{MockPaymentProcessor, SimulatedPaymentProcessor};
pub use storage::InMemorySessionStore;
pub use telegram::{TelegramClient, TelegramPoller};
