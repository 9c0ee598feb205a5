//! Telegram transport - long polling in, Bot API calls out.

mod client;
mod poller;
mod types;

pub use client::TelegramClient;
pub use poller::TelegramPoller;
pub use types::{SendRequest, Update};
