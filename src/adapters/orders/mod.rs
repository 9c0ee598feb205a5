//! Order Recorder adapters.
//!
//! - **JsonOrderRecorder** - Appends orders to a JSON Lines file
//! - **InMemoryOrderRecorder** - Keeps orders in memory (testing/demo)

mod in_memory_order_recorder;
mod json_order_recorder;

pub use in_memory_order_recorder::InMemoryOrderRecorder;
pub use json_order_recorder::JsonOrderRecorder;
