//! Shoe Concierge - Conversational footwear commerce bot
//!
//! Walks each chat from "what are you looking for?" to a placed order:
//! category, gender, product pick, size, address with pincode, and an
//! explicit confirmation, over HTTP or Telegram.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
