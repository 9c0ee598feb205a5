//! Storage Adapters
//!
//! Implementations of the SessionStore port.
//!
//! ## Available Adapters
//!
//! - **InMemorySessionStore** - Sessions in process memory with per-chat locks
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemorySessionStore;
//!
//! let store = InMemorySessionStore::new();
//! let _guard = store.lock(&chat_id).await?;
//! ```

mod in_memory_session_store;

pub use in_memory_session_store::InMemorySessionStore;
