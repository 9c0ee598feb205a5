//! Reply Composer port - turns a structured instruction into chat text.
//!
//! The conversation handler decides *what* to say ([`ReplyInstruction`])
//! and supplies the facts ([`ReplyContext`]); the composer decides *how*
//! to phrase it. A deterministic template implementation is always
//! available; generative backends are optional.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::CollaboratorError;
use crate::domain::catalog::{Category, Gender};
use crate::domain::conversation::DialogueState;
use crate::domain::foundation::{OrderId, Price};

#[async_trait]
pub trait ReplyComposer: Send + Sync {
    async fn compose(
        &self,
        instruction: ReplyInstruction,
        context: &ReplyContext,
    ) -> Result<String, CollaboratorError>;
}

/// What the reply must convey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyInstruction {
    /// Greeting plus a request for the footwear category.
    Welcome,
    /// Category not recognised; list the known ones.
    AskCategoryAgain,
    /// Acknowledge the category and ask who the shoes are for.
    AskGender,
    AskGenderAgain,
    /// Acknowledge category and gender and say options are being fetched.
    FetchingProducts,
    /// Footer after a page of cards: pick by number or name, or ask for more.
    PickProduct,
    /// First page came back empty; the chat starts over.
    NoProducts,
    /// "More" asked on the last page.
    NoMoreProducts,
    ClarifySelection,
    /// Acknowledge the pick and ask for a size.
    AskSize,
    AskSizeAgain,
    AskAddress,
    AskAddressAgain,
    /// Echo the full order and ask for yes/no.
    OrderSummary,
    AskConfirmationAgain,
    OutOfStock,
    PaymentFailed,
    OrderConfirmed,
    OrderCancelled,
    /// A collaborator failed; the chat starts over.
    ServiceUnavailable,
    /// Generic apology for an unexpected handler failure.
    SomethingWentWrong,
}

impl ReplyInstruction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::AskCategoryAgain => "ask_category_again",
            Self::AskGender => "ask_gender",
            Self::AskGenderAgain => "ask_gender_again",
            Self::FetchingProducts => "fetching_products",
            Self::PickProduct => "pick_product",
            Self::NoProducts => "no_products",
            Self::NoMoreProducts => "no_more_products",
            Self::ClarifySelection => "clarify_selection",
            Self::AskSize => "ask_size",
            Self::AskSizeAgain => "ask_size_again",
            Self::AskAddress => "ask_address",
            Self::AskAddressAgain => "ask_address_again",
            Self::OrderSummary => "order_summary",
            Self::AskConfirmationAgain => "ask_confirmation_again",
            Self::OutOfStock => "out_of_stock",
            Self::PaymentFailed => "payment_failed",
            Self::OrderConfirmed => "order_confirmed",
            Self::OrderCancelled => "order_cancelled",
            Self::ServiceUnavailable => "service_unavailable",
            Self::SomethingWentWrong => "something_went_wrong",
        }
    }
}

impl std::fmt::Display for ReplyInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facts a reply may mention. Unset fields are simply not mentioned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_confirmation: Option<String>,
    pub has_more: bool,
}

impl ReplyContext {
    /// Everything the dialogue state knows at its current stage.
    pub fn from_state(state: &DialogueState) -> Self {
        let mut context = Self {
            category: state.category(),
            gender: state.gender(),
            has_more: state.browsing().map(|b| b.has_more_products).unwrap_or(false),
            ..Self::default()
        };
        if let Some(selection) = state.selection() {
            context.product_name = Some(selection.name.clone());
            context.price = Some(selection.price);
        }
        match state {
            DialogueState::AwaitingAddress { size, .. } => {
                context.size = Some(size.to_string());
            }
            DialogueState::AwaitingConfirmation { order, .. } => {
                context.size = Some(order.size.to_string());
                context.address = Some(order.address.clone());
                context.pincode = Some(order.pincode.to_string());
            }
            _ => {}
        }
        context
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_order_id(mut self, order_id: OrderId) -> Self {
        self.order_id = Some(order_id);
        self
    }

    pub fn with_payment_confirmation(mut self, text: impl Into<String>) -> Self {
        self.payment_confirmation = Some(text.into());
        self
    }

    pub fn with_has_more(mut self, has_more: bool) -> Self {
        self.has_more = has_more;
        self
    }
}
