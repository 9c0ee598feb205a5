//! Outbound chat payloads.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::Product;

/// One message sent back to a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    Text { text: String },
    /// Image reference plus a caption with name, category, price and
    /// delivery estimate.
    ProductCard { image: String, caption: String },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Card for `product` shown at 1-based `position` on the page.
    pub fn product_card(product: &Product, position: usize) -> Self {
        Self::ProductCard {
            image: product.image.clone(),
            caption: product.caption(position),
        }
    }

    /// The visible text of the message, whichever kind it is.
    pub fn body(&self) -> &str {
        match self {
            Self::Text { text } => text,
            Self::ProductCard { caption, .. } => caption,
        }
    }
}
