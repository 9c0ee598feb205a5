//! PlaceOrder command handler.
//!
//! Runs the order pipeline for a confirmed draft: availability, then
//! payment, then recording. Each step waits for the previous one and a
//! failing step short-circuits the rest. There is no rollback: a recorded
//! payment stays taken even if recording fails.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::domain::conversation::OrderDraft;
use crate::domain::foundation::{ChatId, OrderId, ValidationError};
use crate::ports::{
    call_with_timeout, AvailabilityChecker, AvailabilityReport, AvailabilityRequest,
    CollaboratorError, OrderRecord, OrderRecorder, PaymentProcessor, PaymentRequest,
};

/// Command to place the order a chat has confirmed.
#[derive(Debug, Clone)]
pub struct PlaceOrderCommand {
    pub chat_id: ChatId,
    pub draft: OrderDraft,
}

/// How far the pipeline got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceOrderOutcome {
    /// Paid and confirmed. `recorded` is false if the order log failed.
    Placed {
        order_id: OrderId,
        payment_confirmation: String,
        recorded: bool,
    },
    /// Inventory answered: unknown SKU or not enough stock.
    OutOfStock { report: AvailabilityReport },
    /// Inventory could not be asked.
    AvailabilityFailed { error: CollaboratorError },
    /// Processor answered with a decline.
    PaymentDeclined {
        order_id: OrderId,
        confirmation_text: String,
    },
    /// Processor could not be asked.
    PaymentFailed {
        order_id: OrderId,
        error: CollaboratorError,
    },
}

impl PlaceOrderOutcome {
    /// True when the chat should keep its confirmation stage so "yes" can
    /// retry the whole pipeline.
    pub fn allows_retry(&self) -> bool {
        matches!(
            self,
            Self::PaymentDeclined { .. } | Self::PaymentFailed { .. }
        )
    }
}

/// Errors that stop the pipeline before any collaborator is called.
#[derive(Debug, Clone, Error)]
pub enum PlaceOrderError {
    #[error("Invalid order: {0}")]
    InvalidOrder(#[from] ValidationError),
}

/// Handler for the order pipeline.
pub struct PlaceOrderHandler {
    availability: Arc<dyn AvailabilityChecker>,
    payments: Arc<dyn PaymentProcessor>,
    recorder: Arc<dyn OrderRecorder>,
    payment_method: String,
    call_timeout: Duration,
}

impl PlaceOrderHandler {
    pub fn new(
        availability: Arc<dyn AvailabilityChecker>,
        payments: Arc<dyn PaymentProcessor>,
        recorder: Arc<dyn OrderRecorder>,
        payment_method: impl Into<String>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            availability,
            payments,
            recorder,
            payment_method: payment_method.into(),
            call_timeout,
        }
    }

    pub async fn handle(
        &self,
        cmd: PlaceOrderCommand,
    ) -> Result<PlaceOrderOutcome, PlaceOrderError> {
        let draft = cmd.draft;
        let sku = draft.selection.sku.clone();

        // 1. Availability
        let request = AvailabilityRequest::new(sku.clone(), 1, draft.pincode.clone())?;
        let report = match call_with_timeout(
            "check_availability",
            self.call_timeout,
            self.availability.check_availability(request),
        )
        .await
        {
            Ok(report) => report,
            Err(error) => {
                tracing::warn!(chat_id = %cmd.chat_id, sku = %sku, error = %error, "Availability check failed");
                return Ok(PlaceOrderOutcome::AvailabilityFailed { error });
            }
        };
        if !report.can_fulfil() {
            tracing::info!(
                chat_id = %cmd.chat_id,
                sku = %sku,
                known = report.ok,
                store_qty = report.store_qty,
                stockroom_qty = report.stockroom_qty,
                "Item not available"
            );
            return Ok(PlaceOrderOutcome::OutOfStock { report });
        }

        // 2. Payment
        let order_id = OrderId::generate();
        let payment = PaymentRequest::new(
            order_id.clone(),
            draft.selection.price,
            self.payment_method.clone(),
        )?;
        let receipt = match call_with_timeout(
            "process_payment",
            self.call_timeout,
            self.payments.process_payment(payment),
        )
        .await
        {
            Ok(receipt) => receipt,
            Err(error) => {
                tracing::warn!(chat_id = %cmd.chat_id, order_id = %order_id, error = %error, "Payment call failed");
                return Ok(PlaceOrderOutcome::PaymentFailed { order_id, error });
            }
        };
        if !receipt.ok {
            tracing::info!(chat_id = %cmd.chat_id, order_id = %order_id, "Payment declined");
            return Ok(PlaceOrderOutcome::PaymentDeclined {
                order_id,
                confirmation_text: receipt.confirmation_text,
            });
        }

        // 3. Record; failure is logged and the order still counts as placed.
        let record = OrderRecord::single(order_id.clone(), sku, draft.address, draft.pincode)?;
        let recorded = match call_with_timeout(
            "record_order",
            self.call_timeout,
            self.recorder.record_order(record),
        )
        .await
        {
            Ok(ack) => ack.ok,
            Err(error) => {
                tracing::warn!(
                    chat_id = %cmd.chat_id,
                    order_id = %order_id,
                    error = %error,
                    "Order paid but not recorded"
                );
                false
            }
        };

        tracing::info!(chat_id = %cmd.chat_id, order_id = %order_id, recorded, "Order placed");
        Ok(PlaceOrderOutcome::Placed {
            order_id,
            payment_confirmation: receipt.confirmation_text,
            recorded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::catalog::InMemoryCatalog;
    use crate::adapters::orders::InMemoryOrderRecorder;
    use crate::adapters::payment::MockPaymentProcessor;
    use crate::domain::catalog::StockLevel;
    use crate::domain::conversation::fixtures::product;
    use crate::domain::conversation::{Pincode, SelectedProduct, ShoeSize};

    struct Fixture {
        catalog: InMemoryCatalog,
        payments: MockPaymentProcessor,
        recorder: InMemoryOrderRecorder,
        handler: PlaceOrderHandler,
    }

    fn fixture() -> Fixture {
        let catalog = InMemoryCatalog::with_products(vec![product("RUN-002", "Velocity Runner")], 1);
        let payments = MockPaymentProcessor::new();
        let recorder = InMemoryOrderRecorder::new();
        let handler = PlaceOrderHandler::new(
            Arc::new(catalog.clone()),
            Arc::new(payments.clone()),
            Arc::new(recorder.clone()),
            "UPI",
            Duration::from_millis(200),
        );
        Fixture {
            catalog,
            payments,
            recorder,
            handler,
        }
    }

    fn command() -> PlaceOrderCommand {
        PlaceOrderCommand {
            chat_id: ChatId::new("chat-1").unwrap(),
            draft: OrderDraft {
                selection: SelectedProduct::from(&product("RUN-002", "Velocity Runner")),
                size: ShoeSize::parse("9").unwrap(),
                address: "my house, pincode 560001".to_string(),
                pincode: Pincode::parse("560001").unwrap(),
            },
        }
    }

    #[tokio::test]
    async fn happy_path_calls_each_collaborator_once() {
        let f = fixture();
        let outcome = f.handler.handle(command()).await.unwrap();

        assert!(matches!(outcome, PlaceOrderOutcome::Placed { recorded: true, .. }));
        assert_eq!(f.catalog.availability_count(), 1);
        assert_eq!(f.payments.call_count(), 1);
        assert_eq!(f.recorder.orders().len(), 1);

        let payment = &f.payments.calls()[0];
        assert_eq!(payment.method, "UPI");
        assert_eq!(payment.amount, product("RUN-002", "x").price);
        assert_eq!(f.recorder.orders()[0].order_id, payment.order_id);
    }

    #[tokio::test]
    async fn out_of_stock_stops_before_payment() {
        let f = fixture();
        f.catalog.set_stock(
            &product("RUN-002", "x").sku,
            StockLevel {
                store_qty: 0,
                stockroom_qty: 0,
            },
        );

        let outcome = f.handler.handle(command()).await.unwrap();
        assert!(matches!(outcome, PlaceOrderOutcome::OutOfStock { .. }));
        assert!(!outcome.allows_retry());
        assert_eq!(f.payments.call_count(), 0);
    }

    #[tokio::test]
    async fn availability_timeout_is_a_failure() {
        let f = fixture();
        f.catalog.set_delay(Some(Duration::from_secs(5)));

        let outcome = f.handler.handle(command()).await.unwrap();
        match outcome {
            PlaceOrderOutcome::AvailabilityFailed { error } => assert!(error.is_timeout()),
            other => panic!("expected availability failure, got {:?}", other),
        }
        assert_eq!(f.payments.call_count(), 0);
    }

    #[tokio::test]
    async fn declined_payment_allows_retry_and_skips_recording() {
        let f = fixture();
        f.payments.set_declined(true);

        let outcome = f.handler.handle(command()).await.unwrap();
        assert!(matches!(outcome, PlaceOrderOutcome::PaymentDeclined { .. }));
        assert!(outcome.allows_retry());
        assert_eq!(f.recorder.attempts(), 0);
    }

    #[tokio::test]
    async fn payment_error_allows_retry() {
        let f = fixture();
        f.payments.set_error(CollaboratorError::unavailable("gateway down"));

        let outcome = f.handler.handle(command()).await.unwrap();
        assert!(matches!(outcome, PlaceOrderOutcome::PaymentFailed { .. }));
        assert!(outcome.allows_retry());
    }

    #[tokio::test]
    async fn recorder_failure_still_places_order() {
        let f = fixture();
        f.recorder.fail_with(Some(CollaboratorError::storage("disk full")));

        let outcome = f.handler.handle(command()).await.unwrap();
        assert!(matches!(outcome, PlaceOrderOutcome::Placed { recorded: false, .. }));
        assert_eq!(f.recorder.attempts(), 1);
    }

    #[tokio::test]
    async fn each_run_gets_a_fresh_order_id() {
        let f = fixture();
        f.catalog.set_stock(
            &product("RUN-002", "x").sku,
            StockLevel {
                store_qty: 5,
                stockroom_qty: 0,
            },
        );
        f.handler.handle(command()).await.unwrap();
        f.handler.handle(command()).await.unwrap();

        let calls = f.payments.calls();
        assert_ne!(calls[0].order_id, calls[1].order_id);
    }
}
