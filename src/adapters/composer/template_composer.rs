//! Template-based reply composer.
//!
//! Deterministic: the same instruction and context always give the same
//! text. This is the default composer and the fallback for generative
//! ones.

use async_trait::async_trait;

use crate::domain::catalog::{Category, Gender};
use crate::ports::{CollaboratorError, ReplyComposer, ReplyContext, ReplyInstruction};

/// Template-based implementation of ReplyComposer.
#[derive(Debug, Clone, Default)]
pub struct TemplateReplyComposer;

impl TemplateReplyComposer {
    pub fn new() -> Self {
        Self
    }

    /// Renders `instruction` synchronously.
    pub fn render(&self, instruction: ReplyInstruction, context: &ReplyContext) -> String {
        match instruction {
            ReplyInstruction::Welcome => format!(
                "Hi! I can help you find the right pair. What are you looking for? \
                 We have {}.",
                category_list()
            ),
            ReplyInstruction::AskCategoryAgain => format!(
                "Sorry, I didn't catch the kind of footwear. Please pick one of: {}.",
                category_list()
            ),
            ReplyInstruction::AskGender => format!(
                "Great, {}! Who are they for: men, women, or yourself?",
                category_label(context)
            ),
            ReplyInstruction::AskGenderAgain => {
                "Who should I look for: men, women, or yourself?".to_string()
            }
            ReplyInstruction::FetchingProducts => format!(
                "Got it, {} for {}. Fetching some options for you...",
                category_label(context),
                gender_label(context.gender)
            ),
            ReplyInstruction::PickProduct => {
                if context.has_more {
                    "Reply with the number or name of the one you like, or say \"more\" to see other options."
                        .to_string()
                } else {
                    "Reply with the number or name of the one you like.".to_string()
                }
            }
            ReplyInstruction::NoProducts => format!(
                "Sorry, I couldn't find any {} for {} right now. Let's start again: what are you looking for?",
                category_label(context),
                gender_label(context.gender)
            ),
            ReplyInstruction::NoMoreProducts => {
                "That's everything I have in this range. Reply with the number or name of the one you like."
                    .to_string()
            }
            ReplyInstruction::ClarifySelection => {
                "I couldn't tell which one you meant. Reply with its number from the list, or part of its name."
                    .to_string()
            }
            ReplyInstruction::AskSize => format!(
                "Nice choice: {}{}. What size do you need?",
                context.product_name.as_deref().unwrap_or("that one"),
                context
                    .price
                    .map(|p| format!(" at {}", p))
                    .unwrap_or_default()
            ),
            ReplyInstruction::AskSizeAgain => {
                "Please tell me your shoe size as a number, for example 8 or 10.".to_string()
            }
            ReplyInstruction::AskAddress => format!(
                "Size {} noted. Where should we deliver? Please include your 6-digit pincode.",
                context.size.as_deref().unwrap_or("-")
            ),
            ReplyInstruction::AskAddressAgain => {
                "I need a delivery address with a 6-digit pincode, for example \"12 MG Road, 560001\"."
                    .to_string()
            }
            ReplyInstruction::OrderSummary => format!(
                "Here's your order:\n{}\nSize: {}\nPrice: {}\nDeliver to: {} (pincode {})\n\nShall I place it? (yes/no)",
                context.product_name.as_deref().unwrap_or("-"),
                context.size.as_deref().unwrap_or("-"),
                context
                    .price
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                context.address.as_deref().unwrap_or("-").trim(),
                context.pincode.as_deref().unwrap_or("-")
            ),
            ReplyInstruction::AskConfirmationAgain => {
                "Please answer yes to place the order or no to cancel it.".to_string()
            }
            ReplyInstruction::OutOfStock => format!(
                "Sorry, {} is out of stock for delivery to {}. Let's find you something else: what are you looking for?",
                context.product_name.as_deref().unwrap_or("that item"),
                context.pincode.as_deref().unwrap_or("your pincode")
            ),
            ReplyInstruction::PaymentFailed => {
                "Sorry, the payment didn't go through. Reply yes to try again or no to cancel."
                    .to_string()
            }
            ReplyInstruction::OrderConfirmed => {
                let mut text = format!(
                    "Your order {} is confirmed! {} (size {}) is on its way to pincode {}.",
                    context
                        .order_id
                        .as_ref()
                        .map(|id| id.to_string())
                        .unwrap_or_default(),
                    context.product_name.as_deref().unwrap_or("Your item"),
                    context.size.as_deref().unwrap_or("-"),
                    context.pincode.as_deref().unwrap_or("-")
                );
                if let Some(confirmation) = &context.payment_confirmation {
                    text.push('\n');
                    text.push_str(confirmation);
                }
                text
            }
            ReplyInstruction::OrderCancelled => {
                "No problem, I've cancelled that. Tell me what you're looking for whenever you're ready."
                    .to_string()
            }
            ReplyInstruction::ServiceUnavailable => {
                "Sorry, I'm having trouble reaching our store right now. Let's start over: what are you looking for?"
                    .to_string()
            }
            ReplyInstruction::SomethingWentWrong => {
                "Sorry, something went wrong on my side. Please try again.".to_string()
            }
        }
    }
}

fn category_list() -> String {
    Category::ALL
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn category_label(context: &ReplyContext) -> &'static str {
    context.category.map(|c| c.label()).unwrap_or("footwear")
}

fn gender_label(gender: Option<Gender>) -> &'static str {
    match gender {
        Some(Gender::Men) => "men",
        Some(Gender::Women) => "women",
        Some(Gender::Unisex) | None => "you",
    }
}

#[async_trait]
impl ReplyComposer for TemplateReplyComposer {
    async fn compose(
        &self,
        instruction: ReplyInstruction,
        context: &ReplyContext,
    ) -> Result<String, CollaboratorError> {
        Ok(self.render(instruction, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{OrderId, Price};

    #[test]
    fn fetching_mentions_category_and_gender() {
        let context = ReplyContext::default()
            .with_category(Category::Sports)
            .with_gender(Gender::Men);
        let text = TemplateReplyComposer::new().render(ReplyInstruction::FetchingProducts, &context);
        assert_eq!(text, "Got it, sports shoes for men. Fetching some options for you...");
    }

    #[test]
    fn summary_includes_every_order_field() {
        let context = ReplyContext {
            product_name: Some("Velocity Runner".into()),
            price: Some(Price::from_major(2499)),
            size: Some("9".into()),
            address: Some("my house, pincode 560001".into()),
            pincode: Some("560001".into()),
            ..ReplyContext::default()
        };
        let text = TemplateReplyComposer::new().render(ReplyInstruction::OrderSummary, &context);
        for part in ["Velocity Runner", "Size: 9", "₹2499.00", "my house", "560001", "yes/no"] {
            assert!(text.contains(part), "missing {:?} in {:?}", part, text);
        }
    }

    #[test]
    fn confirmation_carries_order_id() {
        let order_id = OrderId::generate();
        let context = ReplyContext::default().with_order_id(order_id.clone());
        let text = TemplateReplyComposer::new().render(ReplyInstruction::OrderConfirmed, &context);
        assert!(text.contains(order_id.as_str()));
    }

    #[test]
    fn pick_prompt_mentions_more_only_when_available() {
        let composer = TemplateReplyComposer::new();
        let more = composer.render(
            ReplyInstruction::PickProduct,
            &ReplyContext::default().with_has_more(true),
        );
        let last = composer.render(ReplyInstruction::PickProduct, &ReplyContext::default());
        assert!(more.contains("more"));
        assert!(!last.contains("more"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let composer = TemplateReplyComposer::new();
        let context = ReplyContext::default().with_category(Category::Boots);
        assert_eq!(
            composer.render(ReplyInstruction::AskGender, &context),
            composer.render(ReplyInstruction::AskGender, &context)
        );
    }

    #[tokio::test]
    async fn compose_never_fails() {
        let text = TemplateReplyComposer::new()
            .compose(ReplyInstruction::Welcome, &ReplyContext::default())
            .await
            .unwrap();
        assert!(text.contains("sports shoes"));
    }
}
