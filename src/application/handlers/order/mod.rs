//! Order handlers.

mod place_order;

pub use place_order::{PlaceOrderCommand, PlaceOrderError, PlaceOrderHandler, PlaceOrderOutcome};
