//! HandleMessage command handler.
//!
//! Runs one inbound chat message through the stage table and executes the
//! resulting decision: at most one collaborator call per step, in order,
//! with the chat's session lock held for the whole message. Failures
//! inside one message (errors or panics) become a single apology for that
//! chat and never touch any other chat's session.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use thiserror::Error;

use crate::adapters::composer::TemplateReplyComposer;
use crate::application::handlers::order::{
    PlaceOrderCommand, PlaceOrderError, PlaceOrderHandler, PlaceOrderOutcome,
};
use crate::domain::catalog::{Category, Gender};
use crate::domain::conversation::{
    interpret, Decision, OutboundMessage, RepromptReason, Session, Stage,
};
use crate::domain::foundation::{ChatId, ValidationError};
use crate::ports::{
    call_with_timeout, ProductFinder, ProductQuery, ReplyComposer, ReplyContext,
    ReplyInstruction, SessionStore, SessionStoreError,
};

/// Tunables for the conversation handler.
#[derive(Debug, Clone)]
pub struct ConversationSettings {
    /// Products per page.
    pub page_size: usize,
    /// Upper bound on every collaborator call.
    pub call_timeout: Duration,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            page_size: 3,
            call_timeout: Duration::from_secs(10),
        }
    }
}

/// Command carrying one inbound chat message.
#[derive(Debug, Clone)]
pub struct HandleMessageCommand {
    pub chat_id: ChatId,
    pub text: String,
}

impl HandleMessageCommand {
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }
}

/// Replies for one inbound message and the stage the chat ended in.
#[derive(Debug, Clone)]
pub struct HandleMessageResult {
    pub chat_id: ChatId,
    pub stage: Stage,
    pub replies: Vec<OutboundMessage>,
}

/// Errors that can occur while handling a message.
#[derive(Debug, Error)]
pub enum HandleMessageError {
    /// Message text is empty or whitespace only.
    #[error("Validation error: message text cannot be empty")]
    EmptyText,

    #[error("Session store error: {0}")]
    Store(#[from] SessionStoreError),

    #[error("Invalid transition: {0}")]
    Transition(#[from] ValidationError),

    #[error("Order pipeline error: {0}")]
    Order(#[from] PlaceOrderError),

    #[error("Handler panicked: {0}")]
    Panicked(String),
}

/// Handler that owns the per-chat dialogue.
pub struct ConversationService {
    sessions: Arc<dyn SessionStore>,
    finder: Arc<dyn ProductFinder>,
    composer: Arc<dyn ReplyComposer>,
    orders: PlaceOrderHandler,
    fallback: TemplateReplyComposer,
    settings: ConversationSettings,
}

/// Where the session goes after a message.
enum SessionFate {
    /// Store the (possibly new) session.
    Keep,
    /// Leave the store exactly as it was.
    Untouched,
    /// Remove it; the chat is back at the initial stage.
    Clear,
}

impl ConversationService {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        finder: Arc<dyn ProductFinder>,
        composer: Arc<dyn ReplyComposer>,
        orders: PlaceOrderHandler,
        settings: ConversationSettings,
    ) -> Self {
        Self {
            sessions,
            finder,
            composer,
            orders,
            fallback: TemplateReplyComposer::new(),
            settings,
        }
    }

    /// Handles one inbound message.
    ///
    /// Only an empty message is an error. Every other failure is logged and
    /// answered with a generic apology, leaving the session as it was.
    pub async fn handle(
        &self,
        cmd: HandleMessageCommand,
    ) -> Result<HandleMessageResult, HandleMessageError> {
        let text = cmd.text.trim();
        if text.is_empty() {
            return Err(HandleMessageError::EmptyText);
        }

        let chat_id = cmd.chat_id;
        let _guard = self.sessions.lock(&chat_id).await?;

        let outcome = AssertUnwindSafe(self.process(&chat_id, text))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(HandleMessageError::Panicked(panic_message(panic))));

        match outcome {
            Ok(result) => Ok(result),
            Err(err) => {
                tracing::error!(chat_id = %chat_id, error = %err, "Message handling failed");
                let stage = match self.sessions.get(&chat_id).await {
                    Ok(Some(session)) => session.stage(),
                    _ => Stage::FootwearType,
                };
                Ok(HandleMessageResult {
                    chat_id,
                    stage,
                    replies: vec![OutboundMessage::text(self.fallback.render(
                        ReplyInstruction::SomethingWentWrong,
                        &ReplyContext::default(),
                    ))],
                })
            }
        }
    }

    /// Drops the chat's session and greets it again.
    pub async fn restart(&self, chat_id: ChatId) -> Result<HandleMessageResult, HandleMessageError> {
        let _guard = self.sessions.lock(&chat_id).await?;
        self.sessions.delete(&chat_id).await?;
        tracing::info!(chat_id = %chat_id, "Session restarted");
        let welcome = self
            .say(&chat_id, ReplyInstruction::Welcome, &ReplyContext::default())
            .await;
        Ok(HandleMessageResult {
            chat_id,
            stage: Stage::FootwearType,
            replies: vec![welcome],
        })
    }

    /// Current session, if the chat has one.
    pub async fn session(&self, chat_id: &ChatId) -> Result<Option<Session>, HandleMessageError> {
        Ok(self.sessions.get(chat_id).await?)
    }

    async fn process(
        &self,
        chat_id: &ChatId,
        text: &str,
    ) -> Result<HandleMessageResult, HandleMessageError> {
        let existing = self.sessions.get(chat_id).await?;
        let is_new = existing.is_none();
        let mut session = existing.unwrap_or_else(|| Session::new(chat_id.clone()));
        let before = session.stage();

        let decision = interpret(&session.state, text);
        tracing::debug!(chat_id = %chat_id, stage = %before, decision = ?decision, "Interpreted message");

        let mut replies = Vec::new();
        let fate = match decision {
            Decision::Restart => {
                replies.push(
                    self.say(chat_id, ReplyInstruction::Welcome, &ReplyContext::default())
                        .await,
                );
                SessionFate::Clear
            }

            Decision::Reprompt(reason) => {
                let instruction = if is_new && reason == RepromptReason::UnknownCategory {
                    ReplyInstruction::Welcome
                } else {
                    reprompt_instruction(reason)
                };
                let context = ReplyContext::from_state(&session.state);
                replies.push(self.say(chat_id, instruction, &context).await);
                if is_new {
                    SessionFate::Keep
                } else {
                    SessionFate::Untouched
                }
            }

            Decision::AskGender { category } => {
                session.await_gender(category)?;
                let context = ReplyContext::from_state(&session.state);
                replies.push(self.say(chat_id, ReplyInstruction::AskGender, &context).await);
                SessionFate::Keep
            }

            Decision::Search { category, gender } => {
                let context = ReplyContext::default()
                    .with_category(category)
                    .with_gender(gender);
                replies.push(
                    self.say(chat_id, ReplyInstruction::FetchingProducts, &context)
                        .await,
                );
                self.show_page(chat_id, &mut session, category, gender, 0, &mut replies)
                    .await?
            }

            Decision::NextPage {
                category,
                gender,
                offset,
            } => {
                self.show_page(chat_id, &mut session, category, gender, offset, &mut replies)
                    .await?
            }

            Decision::NoMorePages => {
                let context = ReplyContext::from_state(&session.state);
                replies.push(
                    self.say(chat_id, ReplyInstruction::NoMoreProducts, &context)
                        .await,
                );
                SessionFate::Untouched
            }

            Decision::Select { index } => {
                session.select(index)?;
                let context = ReplyContext::from_state(&session.state);
                replies.push(self.say(chat_id, ReplyInstruction::AskSize, &context).await);
                SessionFate::Keep
            }

            Decision::CaptureSize(size) => {
                session.capture_size(size)?;
                let context = ReplyContext::from_state(&session.state);
                replies.push(self.say(chat_id, ReplyInstruction::AskAddress, &context).await);
                SessionFate::Keep
            }

            Decision::CaptureAddress { address, pincode } => {
                session.capture_address(address, pincode)?;
                let context = ReplyContext::from_state(&session.state);
                replies.push(
                    self.say(chat_id, ReplyInstruction::OrderSummary, &context)
                        .await,
                );
                SessionFate::Keep
            }

            Decision::PlaceOrder => self.place_order(chat_id, &session, &mut replies).await?,

            Decision::Cancel => {
                tracing::info!(chat_id = %chat_id, "Order cancelled by shopper");
                replies.push(
                    self.say(chat_id, ReplyInstruction::OrderCancelled, &ReplyContext::default())
                        .await,
                );
                SessionFate::Clear
            }
        };

        let stage = match fate {
            SessionFate::Keep => {
                let stage = session.stage();
                self.sessions.put(session).await?;
                stage
            }
            SessionFate::Untouched => before,
            SessionFate::Clear => {
                self.sessions.delete(chat_id).await?;
                Stage::FootwearType
            }
        };

        if stage != before {
            tracing::info!(chat_id = %chat_id, from = %before, to = %stage, "Stage transition");
        }

        Ok(HandleMessageResult {
            chat_id: chat_id.clone(),
            stage,
            replies,
        })
    }

    /// Searches one page and shows it as product cards.
    async fn show_page(
        &self,
        chat_id: &ChatId,
        session: &mut Session,
        category: Category,
        gender: Gender,
        offset: usize,
        replies: &mut Vec<OutboundMessage>,
    ) -> Result<SessionFate, HandleMessageError> {
        let query = ProductQuery::browse(category, gender, self.settings.page_size, offset);
        let page = match call_with_timeout(
            "find_products",
            self.settings.call_timeout,
            self.finder.find_products(query),
        )
        .await
        {
            Ok(page) => page,
            Err(error) => {
                tracing::warn!(chat_id = %chat_id, error = %error, "Product search failed");
                replies.push(
                    self.say(chat_id, ReplyInstruction::ServiceUnavailable, &ReplyContext::default())
                        .await,
                );
                return Ok(SessionFate::Clear);
            }
        };

        let context = ReplyContext::default()
            .with_category(category)
            .with_gender(gender);
        if page.is_empty() {
            if offset == 0 {
                replies.push(self.say(chat_id, ReplyInstruction::NoProducts, &context).await);
                return Ok(SessionFate::Clear);
            }
            replies.push(
                self.say(chat_id, ReplyInstruction::NoMoreProducts, &context)
                    .await,
            );
            return Ok(SessionFate::Untouched);
        }

        replies.extend(
            page.items
                .iter()
                .enumerate()
                .map(|(i, product)| OutboundMessage::product_card(product, i + 1)),
        );
        let has_more = page.has_more;
        session.show_page(category, gender, offset, page)?;
        replies.push(
            self.say(
                chat_id,
                ReplyInstruction::PickProduct,
                &context.with_has_more(has_more),
            )
            .await,
        );
        Ok(SessionFate::Keep)
    }

    async fn place_order(
        &self,
        chat_id: &ChatId,
        session: &Session,
        replies: &mut Vec<OutboundMessage>,
    ) -> Result<SessionFate, HandleMessageError> {
        let draft = session.order_draft().cloned().ok_or_else(|| {
            ValidationError::invalid_format("state_transition", "No order awaiting confirmation")
        })?;
        let context = ReplyContext::from_state(&session.state);

        let outcome = self
            .orders
            .handle(PlaceOrderCommand {
                chat_id: chat_id.clone(),
                draft,
            })
            .await?;

        let (instruction, context) = match &outcome {
            PlaceOrderOutcome::Placed {
                order_id,
                payment_confirmation,
                ..
            } => (
                ReplyInstruction::OrderConfirmed,
                context
                    .with_order_id(order_id.clone())
                    .with_payment_confirmation(payment_confirmation.clone()),
            ),
            PlaceOrderOutcome::OutOfStock { .. } => (ReplyInstruction::OutOfStock, context),
            PlaceOrderOutcome::AvailabilityFailed { .. } => {
                (ReplyInstruction::ServiceUnavailable, context)
            }
            PlaceOrderOutcome::PaymentDeclined { .. } | PlaceOrderOutcome::PaymentFailed { .. } => {
                (ReplyInstruction::PaymentFailed, context)
            }
        };
        replies.push(self.say(chat_id, instruction, &context).await);

        Ok(if outcome.allows_retry() {
            SessionFate::Untouched
        } else {
            SessionFate::Clear
        })
    }

    /// Composes one text reply. A failing or slow composer falls back to
    /// the built-in templates.
    async fn say(
        &self,
        chat_id: &ChatId,
        instruction: ReplyInstruction,
        context: &ReplyContext,
    ) -> OutboundMessage {
        let text = match call_with_timeout(
            "compose_reply",
            self.settings.call_timeout,
            self.composer.compose(instruction, context),
        )
        .await
        {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(
                    chat_id = %chat_id,
                    instruction = %instruction,
                    error = %error,
                    "Reply composer failed, using template"
                );
                self.fallback.render(instruction, context)
            }
        };
        OutboundMessage::text(text)
    }
}

fn reprompt_instruction(reason: RepromptReason) -> ReplyInstruction {
    match reason {
        RepromptReason::UnknownCategory => ReplyInstruction::AskCategoryAgain,
        RepromptReason::UnknownGender => ReplyInstruction::AskGenderAgain,
        RepromptReason::UnresolvedSelection => ReplyInstruction::ClarifySelection,
        RepromptReason::MissingSize => ReplyInstruction::AskSizeAgain,
        RepromptReason::MissingPincode => ReplyInstruction::AskAddressAgain,
        RepromptReason::UnclearConfirmation => ReplyInstruction::AskConfirmationAgain,
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
