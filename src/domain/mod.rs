//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, state machine)
//! - `catalog` - Products, categories, genders and stock levels
//! - `conversation` - Dialogue stages, session state, field extraction and the stage table

pub mod catalog;
pub mod conversation;
pub mod foundation;
